use crate::errors::{ShellError, ShellResult};
use crate::redirection::{extract_redirection, RedirectStream, RedirectionSpec};
use std::io::{self, Write};
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Command, Stdio};

/// Build a command that launches `path` but reports `name` as argv[0].
pub fn command_for(name: &str, path: &Path, args: &[String]) -> Command {
    let mut cmd = Command::new(path);
    cmd.arg0(name).args(args);
    cmd
}

/// Execute an external command resolved to `path`.
///
/// A trailing redirection sends one stream to a file and the run becomes
/// fire-and-forget. Otherwise stdout is captured and returned with its final
/// newline removed.
pub fn run_external_command(name: &str, path: &Path, args: &[String]) -> ShellResult<String> {
    let (redirection, args) = extract_redirection(args);
    let mut cmd = command_for(name, path, &args);

    match redirection {
        Some(spec) => run_redirected(name, cmd, &spec),
        None => run_captured(name, &mut cmd),
    }
}

fn run_redirected(name: &str, mut cmd: Command, spec: &RedirectionSpec) -> ShellResult<String> {
    let file = spec.open()?;
    match spec.stream {
        RedirectStream::Stdout => cmd.stdout(Stdio::from(file)).stderr(Stdio::inherit()),
        RedirectStream::Stderr => cmd.stdout(Stdio::inherit()).stderr(Stdio::from(file)),
    };

    // The outcome of a redirected run is not reported to the caller
    match cmd.status() {
        Ok(status) => log::debug!("{} exited with {}", name, status),
        Err(e) => log::warn!("failed to run {}: {}", name, e),
    }
    Ok(String::new())
}

fn run_captured(name: &str, cmd: &mut Command) -> ShellResult<String> {
    let output = cmd
        .stdin(Stdio::inherit())
        .output()
        .map_err(|e| ShellError::ExecutionError(format!("{}: {}", name, e)))?;

    if !output.status.success() {
        log::debug!("{} exited with {}", name, output.status);
        if output.stderr.is_empty() {
            return Err(ShellError::CommandFailed(output.status.to_string()));
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ShellError::CommandFailed(strip_newline(&stderr).to_string()));
    }

    if !output.stderr.is_empty() {
        io::stderr().write_all(&output.stderr)?;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(strip_newline(&stdout).to_string())
}

/// Remove exactly one trailing newline, if present.
pub fn strip_newline(text: &str) -> &str {
    text.strip_suffix('\n').unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn strips_a_single_newline() {
        assert_eq!(strip_newline("hello\n"), "hello");
        assert_eq!(strip_newline("hello\n\n"), "hello\n");
        assert_eq!(strip_newline("hello"), "hello");
        assert_eq!(strip_newline(""), "");
    }

    #[test]
    fn command_targets_the_resolved_path() {
        let cmd = command_for("ls", Path::new("/bin/ls"), &["-l".to_string()]);
        assert_eq!(cmd.get_program(), "/bin/ls");
        assert_eq!(cmd.get_args().collect::<Vec<_>>(), ["-l"]);
    }
}
