use crate::config::ShellConfig;
use crate::errors::{ShellError, ShellResult};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode, WriteLogger};
use std::fs::OpenOptions;

/// Install the global logger.
///
/// With a log file configured, records are appended there; otherwise they go
/// to stderr, which at the default `warn` level keeps the terminal quiet.
pub fn init_logging(config: &ShellConfig) -> ShellResult<()> {
    let result = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            WriteLogger::init(config.log_level, Config::default(), file)
        }
        None => TermLogger::init(
            config.log_level,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ),
    };

    result.map_err(|e| ShellError::ExecutionError(format!("failed to initialise logging: {}", e)))
}
