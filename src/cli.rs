use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

/// Shell command line arguments
#[derive(Parser, Debug, Default)]
#[command(name = "pipeshell", version)]
#[command(about = "An interactive shell with pipelines, redirection and tab completion", long_about = None)]
pub struct ShellArgs {
    /// History file loaded at startup and written on exit (overrides HISTFILE)
    #[arg(long, value_name = "FILE")]
    pub histfile: Option<PathBuf>,

    /// Write diagnostics to FILE instead of the terminal
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Diagnostic verbosity
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Prompt printed before each command
    #[arg(long)]
    pub prompt: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}
