pub mod cli;
pub mod commands;
pub mod completion;
pub mod config;
pub mod errors;
pub mod executor;
pub mod history;
pub mod logging;
pub mod pipeline;
pub mod redirection;
pub mod repl;
pub mod resolver;
pub mod tokenizer;

use config::ShellConfig;
use errors::ShellResult;
use repl::Repl;

/// Main entry point for the shell REPL; returns the status to exit with
pub fn run_shell(config: &ShellConfig) -> ShellResult<i32> {
    let mut repl = Repl::new(config)?;
    log::debug!("shell started with {} search paths", config.search_paths.len());
    repl.run()
}
