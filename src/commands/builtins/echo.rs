use crate::commands::registry::{BuiltinCommand, CommandTable};
use crate::errors::ShellResult;
use std::io::{Read, Write};

pub struct EchoCommand;

impl BuiltinCommand for EchoCommand {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn execute(
        &self,
        _table: &CommandTable,
        args: &[String],
        _stdin: &mut dyn Read,
        stdout: &mut dyn Write,
    ) -> ShellResult<()> {
        writeln!(stdout, "{}", args.join(" "))?;
        Ok(())
    }
}
