use std::io;
use thiserror::Error;

/// Comprehensive error type for shell operations
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("{0}: command not found")]
    CommandNotFound(String),

    #[error("Input error: {0}")]
    InputError(String),

    #[error("{0}")]
    RedirectionError(String),

    #[error("{0}")]
    ExecutionError(String),

    /// An external command exited unsuccessfully; carries its stderr or status.
    #[error("{0}")]
    CommandFailed(String),

    #[error("{0}")]
    BuiltinExecution(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("cd: {0}: No such file or directory")]
    InvalidDirectory(String),

    #[error("exit: {0}: numeric argument required")]
    NumericArgumentRequired(String),

    #[error("failed to create pipe: {0}")]
    PipeCreation(#[source] io::Error),

    /// Raised by `exit`; the REPL turns it into process termination.
    #[error("exit {0}")]
    Exit(i32),

    #[error("Interrupted")]
    Interrupted,
}

pub type ShellResult<T> = Result<T, ShellError>;
