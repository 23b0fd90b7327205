use crate::commands::registry::{BuiltinCommand, CommandTable};
use crate::errors::{ShellError, ShellResult};
use std::io::{Read, Write};

pub struct ExitCommand;

impl BuiltinCommand for ExitCommand {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn execute(
        &self,
        _table: &CommandTable,
        _args: &[String],
        _stdin: &mut dyn Read,
        _stdout: &mut dyn Write,
    ) -> ShellResult<()> {
        // Exit is handled via exit_code(); inside a pipeline it has no effect
        Ok(())
    }

    fn exit_code(&self, args: &[String]) -> ShellResult<Option<i32>> {
        match args.first() {
            None => Ok(Some(0)),
            Some(arg) => arg
                .parse()
                .map(Some)
                .map_err(|_| ShellError::NumericArgumentRequired(arg.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn code(args: &[&str]) -> ShellResult<Option<i32>> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        ExitCommand.exit_code(&args)
    }

    #[test]
    fn defaults_to_zero() {
        assert_eq!(code(&[]).unwrap(), Some(0));
    }

    #[test]
    fn parses_numeric_code() {
        assert_eq!(code(&["42"]).unwrap(), Some(42));
        assert_eq!(code(&["-1"]).unwrap(), Some(-1));
    }

    #[test]
    fn rejects_non_numeric_code() {
        let err = code(&["abc"]).unwrap_err();
        assert!(matches!(err, ShellError::NumericArgumentRequired(ref a) if a == "abc"));
        assert_eq!(err.to_string(), "exit: abc: numeric argument required");
    }
}
