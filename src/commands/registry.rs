use crate::errors::{ShellError, ShellResult};
use crate::history::SharedHistory;
use crate::resolver::PathResolver;
use std::io::{Read, Write};
use std::path::PathBuf;

/// Trait that all builtin commands must implement
pub trait BuiltinCommand: Send + Sync {
    /// The command name (e.g., "echo", "cd", "pwd")
    fn name(&self) -> &'static str;

    /// Execute the command. `args` excludes the command name.
    ///
    /// Builtins only ever talk to the streams they are handed, never to the
    /// process's own stdin/stdout, so they compose inside pipelines.
    fn execute(
        &self,
        table: &CommandTable,
        args: &[String],
        stdin: &mut dyn Read,
        stdout: &mut dyn Write,
    ) -> ShellResult<()>;

    /// Whether this command should cause the shell to exit
    /// Returns Some(exit_code) if shell should exit, None otherwise
    fn exit_code(&self, _args: &[String]) -> ShellResult<Option<i32>> {
        Ok(None)
    }
}

/// State builtins may consult, passed in explicitly rather than read from globals.
pub struct ShellContext {
    pub resolver: PathResolver,
    pub history: SharedHistory,
    pub home: Option<PathBuf>,
}

/// Central registry for all builtin commands
pub struct CommandTable {
    commands: Vec<Box<dyn BuiltinCommand>>,
    context: ShellContext,
}

impl CommandTable {
    /// An empty table; see [`CommandTable::with_builtins`] for the stock set.
    pub fn new(context: ShellContext) -> Self {
        Self {
            commands: Vec::new(),
            context,
        }
    }

    pub fn with_builtins(context: ShellContext) -> Self {
        let mut table = Self::new(context);

        // Register all builtins here - SINGLE POINT OF REGISTRATION
        table.register(super::builtins::EchoCommand);
        table.register(super::builtins::TypeCommand);
        table.register(super::builtins::PwdCommand);
        table.register(super::builtins::CdCommand);
        table.register(super::builtins::ExitCommand);
        table.register(super::builtins::HistoryCommand);

        table
    }

    pub fn register<C: BuiltinCommand + 'static>(&mut self, cmd: C) {
        self.commands.push(Box::new(cmd));
    }

    pub fn context(&self) -> &ShellContext {
        &self.context
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.context.resolver
    }

    fn find(&self, name: &str) -> Option<&dyn BuiltinCommand> {
        self.commands
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c.as_ref())
    }

    /// Check if a command name is a builtin
    pub fn is_builtin(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Get all builtin command names (for completion and type command)
    pub fn names(&self) -> Vec<&'static str> {
        self.commands.iter().map(|c| c.name()).collect()
    }

    /// Execute a builtin command by name
    pub fn invoke(
        &self,
        name: &str,
        args: &[String],
        stdin: &mut dyn Read,
        stdout: &mut dyn Write,
    ) -> ShellResult<()> {
        let command = self
            .find(name)
            .ok_or_else(|| ShellError::CommandNotFound(name.to_string()))?;
        log::debug!("invoking builtin {} with {:?}", name, args);
        command.execute(self, args, stdin, stdout)
    }

    /// Check if command should exit the shell
    pub fn exit_request(&self, name: &str, args: &[String]) -> ShellResult<Option<i32>> {
        match self.find(name) {
            Some(command) => command.exit_code(args),
            None => Ok(None),
        }
    }
}
