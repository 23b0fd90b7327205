use crate::commands::{run_external_command, strip_newline, CommandTable};
use crate::errors::{ShellError, ShellResult};
use crate::pipeline::{execute_pipeline, is_pipeline};
use crate::tokenizer::tokenize;
use std::io;
use std::sync::Arc;

/// Dispatches one input line to builtins, external programs or a pipeline.
pub struct Executor {
    table: Arc<CommandTable>,
}

impl Executor {
    pub fn new(table: CommandTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    pub fn table(&self) -> &Arc<CommandTable> {
        &self.table
    }

    /// Execute a line and return the text it produced.
    ///
    /// Pipelines write straight to the terminal and yield an empty string.
    /// `exit` surfaces as [`ShellError::Exit`].
    pub fn execute(&self, line: &str) -> ShellResult<String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(String::new());
        }

        if is_pipeline(line) {
            execute_pipeline(&self.table, line)?;
            return Ok(String::new());
        }

        self.execute_single(line)
    }

    fn execute_single(&self, line: &str) -> ShellResult<String> {
        let parts = tokenize(line);
        let Some((name, args)) = parts.split_first() else {
            return Ok(String::new());
        };

        // Redirected builtins fall through to the external program of the same name
        if self.table.is_builtin(name) && !line.contains('>') {
            if let Some(code) = self.table.exit_request(name, args)? {
                return Err(ShellError::Exit(code));
            }

            let mut buffer = Vec::new();
            self.table
                .invoke(name, args, &mut io::stdin(), &mut buffer)?;
            let output = String::from_utf8_lossy(&buffer);
            return Ok(strip_newline(&output).to_string());
        }

        let path = self
            .table
            .resolver()
            .resolve(name)
            .ok_or_else(|| ShellError::CommandNotFound(name.to_string()))?;
        log::debug!("running external {} ({})", name, path.display());
        run_external_command(name, &path, args)
    }
}
