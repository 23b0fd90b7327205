use crate::commands::registry::{BuiltinCommand, CommandTable};
use crate::errors::{ShellError, ShellResult};
use std::env;
use std::io::{Read, Write};

pub struct PwdCommand;

impl BuiltinCommand for PwdCommand {
    fn name(&self) -> &'static str {
        "pwd"
    }

    fn execute(
        &self,
        _table: &CommandTable,
        _args: &[String],
        _stdin: &mut dyn Read,
        stdout: &mut dyn Write,
    ) -> ShellResult<()> {
        let current_dir =
            env::current_dir().map_err(|e| ShellError::BuiltinExecution(format!("pwd: {}", e)))?;
        writeln!(stdout, "{}", current_dir.display())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::registry::tests::{run, test_table};
    use pretty_assertions::assert_eq;
    use std::env;

    #[test]
    fn prints_current_directory() {
        let expected = format!("{}\n", env::current_dir().unwrap().display());
        assert_eq!(run(&test_table(), "pwd", &[]).unwrap(), expected);
    }
}
