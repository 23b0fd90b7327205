use crate::cli::ShellArgs;
use log::LevelFilter;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

pub const DEFAULT_PROMPT: &str = "$ ";

/// Everything the shell needs from its surroundings, gathered once at startup.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Directories searched for external commands, in priority order.
    pub search_paths: Vec<PathBuf>,
    pub history_file: Option<PathBuf>,
    pub home: Option<PathBuf>,
    pub prompt: String,
    pub log_file: Option<PathBuf>,
    pub log_level: LevelFilter,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            search_paths: Vec::new(),
            history_file: None,
            home: None,
            prompt: DEFAULT_PROMPT.to_string(),
            log_file: None,
            log_level: LevelFilter::Warn,
        }
    }
}

impl ShellConfig {
    /// Read `PATH`, `HOME` and `HISTFILE` from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var_os(key))
    }

    pub fn from_vars(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

        Self {
            search_paths: non_empty("PATH")
                .map(|path| env::split_paths(&path).collect())
                .unwrap_or_default(),
            history_file: non_empty("HISTFILE").map(PathBuf::from),
            home: non_empty("HOME").map(PathBuf::from),
            ..Self::default()
        }
    }

    /// Command-line flags take precedence over the environment.
    pub fn apply_args(mut self, args: &ShellArgs) -> Self {
        if let Some(histfile) = &args.histfile {
            self.history_file = Some(histfile.clone());
        }
        if let Some(log_file) = &args.log_file {
            self.log_file = Some(log_file.clone());
        }
        if let Some(level) = args.log_level {
            self.log_level = level.into();
        }
        if let Some(prompt) = &args.prompt {
            self.prompt = prompt.clone();
        }
        self
    }
}
