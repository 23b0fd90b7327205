use crate::commands::{CommandTable, ShellContext};
use crate::completion::{CommandIndex, ShellHelper};
use crate::config::ShellConfig;
use crate::errors::{ShellError, ShellResult};
use crate::executor::Executor;
use crate::history::{History, SharedHistory};
use crate::resolver::PathResolver;
use rustyline::config::BellStyle;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{ColorMode, CompletionType, Config, Editor, Event, EventHandler};
use std::path::PathBuf;
use std::sync::Arc;

/// Exit status used when `exit` is given a non-numeric argument
const BAD_EXIT_ARGUMENT_STATUS: i32 = 2;

fn readline_error(e: ReadlineError) -> ShellError {
    ShellError::InputError(format!("Readline error: {}", e))
}

/// The interactive read-eval-print loop
pub struct Repl {
    editor: Editor<ShellHelper, DefaultHistory>,
    executor: Executor,
    history: SharedHistory,
    history_file: Option<PathBuf>,
    prompt: String,
}

impl Repl {
    pub fn new(config: &ShellConfig) -> ShellResult<Self> {
        let mut history = History::new();
        if let Some(path) = &config.history_file {
            if path.exists() {
                if let Err(e) = history.read_from(path) {
                    log::warn!("could not load history from {}: {}", path.display(), e);
                }
            }
        }

        let editor_config = Config::builder()
            .color_mode(ColorMode::Enabled)
            .completion_type(CompletionType::List)
            .bell_style(BellStyle::None)
            .auto_add_history(true)
            .build();

        let mut editor = Editor::with_config(editor_config).map_err(|e| {
            ShellError::InputError(format!("Failed to create readline editor: {}", e))
        })?;
        for line in history.entries() {
            editor.add_history_entry(line.as_str()).map_err(readline_error)?;
        }

        let history = history.shared();
        let table = CommandTable::with_builtins(ShellContext {
            resolver: PathResolver::new(config.search_paths.clone()),
            history: Arc::clone(&history),
            home: config.home.clone(),
        });

        let helper = ShellHelper::new(CommandIndex::from_table(&table), &config.prompt);
        let reset = helper.reset_handler();
        editor.set_helper(Some(helper));
        editor.bind_sequence(Event::Any, EventHandler::Conditional(Box::new(reset)));

        Ok(Self {
            editor,
            executor: Executor::new(table),
            history,
            history_file: config.history_file.clone(),
            prompt: config.prompt.clone(),
        })
    }

    /// Read input from the user using rustyline
    pub fn read_input(&mut self) -> ShellResult<String> {
        loop {
            match self.editor.readline(&self.prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if !trimmed.is_empty() {
                        return Ok(trimmed.to_string());
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl-C pressed, continue loop
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl-D pressed, exit gracefully
                    return Err(ShellError::Interrupted);
                }
                Err(e) => return Err(readline_error(e)),
            }
        }
    }

    /// Record a command line in history, run it and print what it produced
    pub fn handle_command_input(&mut self, input: &str) -> ShellResult<()> {
        let recorded = match self.history.lock() {
            Ok(mut history) => {
                history.push(input);
                Some(history.entries().len())
            }
            Err(_) => None,
        };

        let result = self.executor.execute(input);
        if let Some(recorded) = recorded {
            self.recall_loaded_entries(recorded);
        }

        let output = result?;
        if !output.is_empty() {
            println!("{}", output);
        }
        Ok(())
    }

    /// Make entries added by a builtin (`history -r`) reachable with the arrow keys.
    fn recall_loaded_entries(&mut self, from: usize) {
        let loaded = match self.history.lock() {
            Ok(history) => history.since(from).to_vec(),
            Err(_) => return,
        };
        for line in &loaded {
            if let Err(e) = self.editor.add_history_entry(line.as_str()) {
                log::warn!("could not add {:?} to line editor history: {}", line, e);
            }
        }
    }

    /// Run until `exit` or end of input; returns the process exit status.
    pub fn run(&mut self) -> ShellResult<i32> {
        loop {
            let input = match self.read_input() {
                Ok(input) => input,
                Err(ShellError::Interrupted) => {
                    self.save_history();
                    return Ok(0);
                }
                Err(e) => return Err(e),
            };

            match self.handle_command_input(&input) {
                Ok(()) => {}
                Err(ShellError::Exit(code)) => {
                    self.save_history();
                    return Ok(code);
                }
                Err(e @ ShellError::NumericArgumentRequired(_)) => {
                    eprintln!("{}", e);
                    self.save_history();
                    return Ok(BAD_EXIT_ARGUMENT_STATUS);
                }
                Err(e) => eprintln!("{}", e),
            }
        }
    }

    fn save_history(&self) {
        let Some(path) = &self.history_file else {
            return;
        };
        if let Ok(mut history) = self.history.lock() {
            if let Err(e) = history.write_to(path) {
                log::warn!("could not save history to {}: {}", path.display(), e);
            }
        }
    }
}
