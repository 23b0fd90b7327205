use crate::commands::registry::{BuiltinCommand, CommandTable};
use crate::errors::{ShellError, ShellResult};
use std::env;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub struct CdCommand;

/// Expand `~` (alone or as a `~/` prefix) against `home`.
fn target_dir(path: Option<&str>, home: Option<&Path>) -> ShellResult<PathBuf> {
    let home_dir = || {
        home.map(Path::to_path_buf)
            .ok_or_else(|| ShellError::BuiltinExecution("cd: HOME not set".to_string()))
    };

    match path {
        None | Some("~") => home_dir(),
        Some(p) => match p.strip_prefix("~/") {
            Some(rest) => Ok(home_dir()?.join(rest)),
            None => Ok(PathBuf::from(p)),
        },
    }
}

impl BuiltinCommand for CdCommand {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn execute(
        &self,
        table: &CommandTable,
        args: &[String],
        _stdin: &mut dyn Read,
        _stdout: &mut dyn Write,
    ) -> ShellResult<()> {
        let requested = args.first().map(String::as_str);
        let target = target_dir(requested, table.context().home.as_deref())?;

        env::set_current_dir(&target).map_err(|_| {
            let shown = requested.map_or_else(|| target.display().to_string(), str::to_string);
            ShellError::InvalidDirectory(shown)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::registry::tests::{run, test_table};
    use pretty_assertions::assert_eq;

    #[test]
    fn tilde_expands_to_home() {
        let home = Path::new("/home/user");
        assert_eq!(target_dir(None, Some(home)).unwrap(), home);
        assert_eq!(target_dir(Some("~"), Some(home)).unwrap(), home);
        assert_eq!(
            target_dir(Some("~/src"), Some(home)).unwrap(),
            Path::new("/home/user/src")
        );
        assert_eq!(target_dir(Some("/tmp"), Some(home)).unwrap(), Path::new("/tmp"));
    }

    #[test]
    fn missing_home_is_an_error() {
        assert!(matches!(
            target_dir(Some("~"), None),
            Err(ShellError::BuiltinExecution(_))
        ));
    }

    #[test]
    fn missing_directory_reports_chdir_error() {
        let err = run(&test_table(), "cd", &["/does_not_exist"]).unwrap_err();
        assert_eq!(err.to_string(), "cd: /does_not_exist: No such file or directory");
    }
}
