use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// History shared between the REPL and the builtins that inspect it
pub type SharedHistory = Arc<Mutex<History>>;

/// Command history state
#[derive(Debug, Default, Clone)]
pub struct History {
    entries: Vec<String>,
    /// Entries before this index were already flushed by `append_to`.
    appended: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> SharedHistory {
        Arc::new(Mutex::new(self))
    }

    /// Add a command to history
    pub fn push(&mut self, command: &str) {
        self.entries.push(command.to_string());
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Entries recorded after the first `from`; empty when `from` is past the end.
    pub fn since(&self, from: usize) -> &[String] {
        self.entries.get(from..).unwrap_or_default()
    }

    /// Write the last `limit` entries (all when `None`) with 1-based numbering.
    pub fn render(&self, limit: Option<usize>, out: &mut dyn Write) -> io::Result<()> {
        let total = self.entries.len();
        let start = limit.map_or(0, |n| total.saturating_sub(n));

        for (index, line) in self.entries.iter().enumerate().skip(start) {
            writeln!(out, "{:>5}  {}", index + 1, line)?;
        }
        Ok(())
    }

    /// Append every non-empty line of `path` to the history.
    pub fn read_from(&mut self, path: &Path) -> io::Result<()> {
        let content = fs::read_to_string(path)?;
        self.entries.extend(
            content
                .lines()
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
        Ok(())
    }

    /// Replace the contents of `path` with the full history.
    pub fn write_to(&mut self, path: &Path) -> io::Result<()> {
        let mut file = fs::File::create(path)?;
        for line in &self.entries {
            writeln!(file, "{}", line)?;
        }
        self.appended = self.entries.len();
        Ok(())
    }

    /// Append the entries added since the previous append to `path`.
    pub fn append_to(&mut self, path: &Path) -> io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        for line in &self.entries[self.appended..] {
            writeln!(file, "{}", line)?;
        }
        self.appended = self.entries.len();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn history_of(lines: &[&str]) -> History {
        let mut history = History::new();
        for line in lines {
            history.push(line);
        }
        history
    }

    fn rendered(history: &History, limit: Option<usize>) -> String {
        let mut out = Vec::new();
        history.render(limit, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn renders_numbered_entries() {
        let history = history_of(&["echo hello", "pwd", "history"]);
        assert_eq!(
            rendered(&history, None),
            "    1  echo hello\n    2  pwd\n    3  history\n"
        );
        assert_eq!(rendered(&history, Some(2)), "    2  pwd\n    3  history\n");
        assert_eq!(rendered(&history, Some(10)).lines().count(), 3);
    }

    #[test]
    fn write_then_read_restores_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hist");

        let mut history = history_of(&["ls", "cd /tmp"]);
        history.write_to(&path).unwrap();

        let mut restored = history_of(&["first"]);
        restored.read_from(&path).unwrap();
        assert_eq!(restored.entries(), ["first", "ls", "cd /tmp"]);
    }

    #[test]
    fn append_only_writes_new_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hist");

        let mut history = history_of(&["one", "two"]);
        history.append_to(&path).unwrap();
        history.push("three");
        history.append_to(&path).unwrap();
        history.append_to(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\nthree\n");
    }

    #[test]
    fn since_returns_entries_loaded_later() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hist");
        fs::write(&path, "make\nmake test\n").unwrap();

        let mut history = history_of(&["history -r hist"]);
        let recorded = history.entries().len();
        history.read_from(&path).unwrap();

        assert_eq!(history.since(recorded), ["make", "make test"]);
        assert!(history.since(10).is_empty());
    }

    #[test]
    fn reading_missing_file_fails() {
        let mut history = History::new();
        assert!(history.read_from(Path::new("/no/such/history")).is_err());
    }
}
