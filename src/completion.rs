//! Tab completion for command names.
//!
//! [`CompletionEngine`] holds the matching rules and the one bit of
//! "tab was just pressed" state. [`ShellHelper`] adapts it to rustyline.

use crate::commands::CommandTable;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{
    Cmd, ConditionalEventHandler, Context, Event, EventContext, Helper, KeyCode, KeyEvent,
    Modifiers, RepeatCount,
};
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Supplies raw completion candidates for the word under the cursor.
pub trait CandidateSource {
    /// Returns the byte offset where the partial word starts and every
    /// candidate that extends it. Duplicates are allowed.
    fn matches(&self, line: &str, pos: usize) -> (usize, Vec<String>);
}

/// Side effect requested alongside a completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    None,
    Bell,
    /// Newline-framed listing of every candidate, ready to print.
    List(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Text replacing `line[start..pos]`.
    pub replacement: Option<(usize, String)>,
    pub signal: Signal,
}

impl Completion {
    fn bell() -> Self {
        Self {
            replacement: None,
            signal: Signal::Bell,
        }
    }

    fn insert(start: usize, text: String) -> Self {
        Self {
            replacement: Some((start, text)),
            signal: Signal::None,
        }
    }
}

#[derive(Debug, Default)]
pub struct CompletionEngine {
    awaiting_second_press: bool,
}

impl CompletionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_awaiting_second_press(&self) -> bool {
        self.awaiting_second_press
    }

    /// Any key other than Tab forgets the previous press.
    pub fn notify_other_key(&mut self) {
        self.awaiting_second_press = false;
    }

    pub fn complete(&mut self, line: &str, pos: usize, source: &dyn CandidateSource) -> Completion {
        let (offset, mut matches) = source.matches(line, pos);
        matches.sort();
        matches.dedup();

        match matches.len() {
            0 => Completion::bell(),
            1 => Completion::insert(offset, format!("{} ", matches[0])),
            _ => {
                let lcp = longest_common_prefix(&matches);
                let partial = &line[offset..pos];

                if self.awaiting_second_press && (lcp.is_empty() || lcp == partial) {
                    self.awaiting_second_press = false;
                    let before = &line[..offset];
                    let listing = matches
                        .iter()
                        .map(|m| format!("{}{}", before, m))
                        .collect::<Vec<_>>()
                        .join("  ");
                    return Completion {
                        replacement: None,
                        signal: Signal::List(format!("\n{}\n", listing)),
                    };
                }

                self.awaiting_second_press = true;
                if lcp.len() > partial.len() {
                    Completion::insert(offset, lcp.to_string())
                } else {
                    Completion::bell()
                }
            }
        }
    }
}

/// Longest prefix shared by every item, compared character by character.
pub fn longest_common_prefix(items: &[String]) -> &str {
    let Some((first, rest)) = items.split_first() else {
        return "";
    };

    let mut len = first.len();
    for other in rest {
        let shared = first
            .char_indices()
            .zip(other.chars())
            .take_while(|((_, a), b)| a == b)
            .last()
            .map_or(0, |((i, c), _)| i + c.len_utf8());
        len = len.min(shared);
    }
    &first[..len]
}

/// Command names known at startup: builtins plus executables on the search path
#[derive(Debug, Clone, Default)]
pub struct CommandIndex {
    names: Vec<String>,
}

impl CommandIndex {
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        Self {
            names: names.into_iter().collect(),
        }
    }

    pub fn from_table(table: &CommandTable) -> Self {
        let builtins = table.names().into_iter().map(str::to_string);
        Self::new(builtins.chain(table.resolver().executables()))
    }
}

impl CandidateSource for CommandIndex {
    /// Only the first word of the line is completed.
    fn matches(&self, line: &str, pos: usize) -> (usize, Vec<String>) {
        let before = &line[..pos];
        let offset = before.len() - before.trim_start().len();
        let word = &before[offset..];
        if word.contains(char::is_whitespace) {
            return (pos, Vec::new());
        }

        let found = self
            .names
            .iter()
            .filter(|name| name.starts_with(word))
            .cloned()
            .collect();
        (offset, found)
    }
}

/// rustyline helper driving the completion engine
pub struct ShellHelper {
    engine: Arc<Mutex<CompletionEngine>>,
    index: CommandIndex,
    prompt: String,
}

impl ShellHelper {
    pub fn new(index: CommandIndex, prompt: &str) -> Self {
        Self {
            engine: Arc::new(Mutex::new(CompletionEngine::new())),
            index,
            prompt: prompt.to_string(),
        }
    }

    /// Key hook that clears the engine's turn state on every non-Tab key.
    pub fn reset_handler(&self) -> TabResetHandler {
        TabResetHandler {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let completion = self
            .engine
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .complete(line, pos, &self.index);

        let mut stdout = io::stdout();
        match &completion.signal {
            Signal::None => {}
            Signal::Bell => stdout.write_all(b"\x07")?,
            // Print the listing, then redraw the prompt and what was typed
            Signal::List(listing) => write!(stdout, "{}{}{}", listing, self.prompt, line)?,
        }
        stdout.flush()?;

        Ok(match completion.replacement {
            Some((start, text)) => (
                start,
                vec![Pair {
                    display: text.clone(),
                    replacement: text,
                }],
            ),
            None => (pos, Vec::new()),
        })
    }
}

impl Hinter for ShellHelper {
    type Hint = String;
}

impl Highlighter for ShellHelper {}

impl Validator for ShellHelper {}

impl Helper for ShellHelper {}

/// Bound to [`Event::Any`]; never overrides the key's normal action.
pub struct TabResetHandler {
    engine: Arc<Mutex<CompletionEngine>>,
}

impl ConditionalEventHandler for TabResetHandler {
    fn handle(
        &self,
        evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        _ctx: &EventContext,
    ) -> Option<Cmd> {
        if evt.get(0) != Some(&KeyEvent(KeyCode::Tab, Modifiers::NONE)) {
            self.engine
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .notify_other_key();
        }
        None
    }
}
