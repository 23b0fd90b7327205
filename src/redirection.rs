use crate::errors::{ShellError, ShellResult};
use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;

/// Which stream of the child a redirection captures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectStream {
    Stdout,
    Stderr,
}

/// Redirection mode (overwrite or append)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectionMode {
    Truncate,
    Append,
}

/// Represents a redirection specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectionSpec {
    pub stream: RedirectStream,
    pub mode: RedirectionMode,
    pub path: String,
}

impl RedirectionSpec {
    /// Interpret `operator` (`>`, `1>`, `>>`, `1>>`, `2>`, `2>>`) targeting `path`.
    pub fn from_operator(operator: &str, path: &str) -> Self {
        let stream = if operator.starts_with('2') {
            RedirectStream::Stderr
        } else {
            RedirectStream::Stdout
        };
        let mode = if operator.contains(">>") {
            RedirectionMode::Append
        } else {
            RedirectionMode::Truncate
        };

        Self {
            stream,
            mode,
            path: path.to_string(),
        }
    }

    /// Open the target file, creating it when absent.
    pub fn open(&self) -> ShellResult<File> {
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(self.mode == RedirectionMode::Truncate)
            .append(self.mode == RedirectionMode::Append)
            .mode(0o644)
            .open(&self.path)
            .map_err(|e| ShellError::RedirectionError(format!("{}: {}", self.path, e)))
    }
}

/// Split a trailing `operator path` pair off the argument list.
///
/// Only the last two arguments are examined; a lone operator without a
/// target is left in place.
pub fn extract_redirection(args: &[String]) -> (Option<RedirectionSpec>, Vec<String>) {
    if args.len() < 2 {
        return (None, args.to_vec());
    }

    let operator = &args[args.len() - 2];
    if !operator.contains('>') {
        return (None, args.to_vec());
    }

    let spec = RedirectionSpec::from_operator(operator, &args[args.len() - 1]);
    log::debug!("redirection {:?}", spec);
    (Some(spec), args[..args.len() - 2].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::io::Write;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn recognizes_every_operator() {
        let cases = [
            (">", RedirectStream::Stdout, RedirectionMode::Truncate),
            ("1>", RedirectStream::Stdout, RedirectionMode::Truncate),
            (">>", RedirectStream::Stdout, RedirectionMode::Append),
            ("1>>", RedirectStream::Stdout, RedirectionMode::Append),
            ("2>", RedirectStream::Stderr, RedirectionMode::Truncate),
            ("2>>", RedirectStream::Stderr, RedirectionMode::Append),
        ];

        for (op, stream, mode) in cases {
            let (spec, rest) = extract_redirection(&strings(&["-l", op, "out.txt"]));
            assert_eq!(
                spec,
                Some(RedirectionSpec {
                    stream,
                    mode,
                    path: "out.txt".to_string(),
                }),
                "operator {op}"
            );
            assert_eq!(rest, ["-l"]);
        }
    }

    #[test]
    fn lone_operator_is_left_alone() {
        let args = strings(&["hello", ">"]);
        assert_eq!(extract_redirection(&args), (None, args.clone()));

        let args = strings(&[">"]);
        assert_eq!(extract_redirection(&args), (None, args.clone()));
    }

    #[test]
    fn plain_arguments_unchanged() {
        let args = strings(&["a", "b", "c"]);
        assert_eq!(extract_redirection(&args), (None, args.clone()));
    }

    #[test]
    fn only_trailing_pair_is_considered() {
        let args = strings(&[">", "first", "x", "y"]);
        assert_eq!(extract_redirection(&args), (None, args.clone()));
    }

    #[test]
    fn open_truncates_or_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        let path_str = path.to_str().unwrap();

        writeln!(RedirectionSpec::from_operator(">", path_str).open().unwrap(), "one").unwrap();
        writeln!(RedirectionSpec::from_operator(">", path_str).open().unwrap(), "two").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "two\n");

        writeln!(RedirectionSpec::from_operator(">>", path_str).open().unwrap(), "three").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "two\nthree\n");
    }

    #[test]
    fn open_failure_is_redirection_error() {
        let spec = RedirectionSpec::from_operator(">", "/nonexistent-dir/file.txt");
        assert!(matches!(spec.open(), Err(ShellError::RedirectionError(_))));
    }
}
