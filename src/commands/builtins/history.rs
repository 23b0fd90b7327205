use crate::commands::registry::{BuiltinCommand, CommandTable};
use crate::errors::{ShellError, ShellResult};
use clap::Parser;
use std::io::{Read, Write};
use std::path::PathBuf;

/// Arguments accepted by the `history` builtin
#[derive(Parser, Debug)]
#[command(name = "history", disable_help_flag = true)]
struct HistoryArgs {
    /// Append the contents of FILE to the history
    #[arg(short = 'r', value_name = "FILE", conflicts_with_all = ["write", "append", "limit"])]
    read: Option<PathBuf>,

    /// Write the whole history to FILE
    #[arg(short = 'w', value_name = "FILE", conflicts_with_all = ["append", "limit"])]
    write: Option<PathBuf>,

    /// Append entries added since the last append to FILE
    #[arg(short = 'a', value_name = "FILE", conflicts_with = "limit")]
    append: Option<PathBuf>,

    /// Only show the last N entries
    limit: Option<usize>,
}

pub struct HistoryCommand;

impl BuiltinCommand for HistoryCommand {
    fn name(&self) -> &'static str {
        "history"
    }

    fn execute(
        &self,
        table: &CommandTable,
        args: &[String],
        _stdin: &mut dyn Read,
        stdout: &mut dyn Write,
    ) -> ShellResult<()> {
        let argv = std::iter::once("history").chain(args.iter().map(String::as_str));
        let parsed = HistoryArgs::try_parse_from(argv).map_err(|e| {
            let rendered = e.to_string();
            let first_line = rendered.lines().next().unwrap_or_default();
            let first_line = first_line.trim_start_matches("error: ");
            ShellError::BuiltinExecution(format!("history: {}", first_line))
        })?;

        let file_error = |path: &PathBuf, e: std::io::Error| {
            ShellError::BuiltinExecution(format!("history: {}: {}", path.display(), e))
        };

        // Rendered under the lock, written once the lock is released
        let mut listing = Vec::new();
        {
            let mut history = table.context().history.lock().map_err(|_| {
                ShellError::BuiltinExecution("history: state poisoned".to_string())
            })?;

            if let Some(path) = &parsed.read {
                return history.read_from(path).map_err(|e| file_error(path, e));
            } else if let Some(path) = &parsed.write {
                return history.write_to(path).map_err(|e| file_error(path, e));
            } else if let Some(path) = &parsed.append {
                return history.append_to(path).map_err(|e| file_error(path, e));
            }
            history.render(parsed.limit, &mut listing)?;
        }

        stdout.write_all(&listing)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::registry::tests::{run, test_table};
    use crate::errors::ShellError;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn record(table: &crate::commands::registry::CommandTable, lines: &[&str]) {
        let mut history = table.context().history.lock().unwrap();
        for line in lines {
            history.push(line);
        }
    }

    #[test]
    fn lists_all_or_last_n() {
        let table = test_table();
        record(&table, &["echo a", "echo b", "history 2"]);

        assert_eq!(
            run(&table, "history", &[]).unwrap(),
            "    1  echo a\n    2  echo b\n    3  history 2\n"
        );
        assert_eq!(
            run(&table, "history", &["2"]).unwrap(),
            "    2  echo b\n    3  history 2\n"
        );
    }

    #[test]
    fn write_append_and_read_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hist.txt");
        let path_arg = path.to_str().unwrap();

        let table = test_table();
        record(&table, &["ls", "pwd"]);
        assert_eq!(run(&table, "history", &["-w", path_arg]).unwrap(), "");
        assert_eq!(fs::read_to_string(&path).unwrap(), "ls\npwd\n");

        record(&table, &["cd /"]);
        run(&table, "history", &["-a", path_arg]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "ls\npwd\ncd /\n");

        let fresh = test_table();
        run(&fresh, "history", &["-r", path_arg]).unwrap();
        assert_eq!(
            fresh.context().history.lock().unwrap().entries(),
            ["ls", "pwd", "cd /"]
        );
    }

    #[test]
    fn bad_arguments_are_builtin_errors() {
        let table = test_table();
        assert!(matches!(
            run(&table, "history", &["abc"]),
            Err(ShellError::BuiltinExecution(_))
        ));
        assert!(matches!(
            run(&table, "history", &["-r", "/no/such/file"]),
            Err(ShellError::BuiltinExecution(_))
        ));
    }
}
