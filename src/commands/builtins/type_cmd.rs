use crate::commands::registry::{BuiltinCommand, CommandTable};
use crate::errors::ShellResult;
use std::io::{Read, Write};

pub struct TypeCommand;

impl BuiltinCommand for TypeCommand {
    fn name(&self) -> &'static str {
        "type"
    }

    fn execute(
        &self,
        table: &CommandTable,
        args: &[String],
        _stdin: &mut dyn Read,
        stdout: &mut dyn Write,
    ) -> ShellResult<()> {
        let Some(name) = args.first() else {
            return Ok(());
        };

        if table.is_builtin(name) {
            writeln!(stdout, "{} is a shell builtin", name)?;
        } else if let Some(path) = table.resolver().resolve(name) {
            writeln!(stdout, "{} is {}", name, path.display())?;
        } else {
            writeln!(stdout, "{}: not found", name)?;
        }
        Ok(())
    }
}
