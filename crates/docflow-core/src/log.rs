//! Run log threaded through a documentation run
//!
//! Every status line is forwarded to `tracing` under the `docflow` target and
//! kept in memory, so callers can inspect what a run reported after the fact.

use tracing::Level;

/// One reported status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: Level,
    pub message: String,
}

/// Explicit logging context for one run
#[derive(Debug, Default)]
pub struct RunLog {
    records: Vec<LogRecord>,
}

impl RunLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(target: "docflow", "{message}");
        self.push(Level::INFO, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(target: "docflow", "{message}");
        self.push(Level::WARN, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(target: "docflow", "{message}");
        self.push(Level::ERROR, message);
    }

    /// Report a failed step as an error line starting with a capital letter
    pub fn failure(&mut self, error: &impl std::fmt::Display) {
        self.error(capitalize(&error.to_string()));
    }

    fn push(&mut self, level: Level, message: String) {
        self.records.push(LogRecord { level, message });
    }

    /// All records in the order they were reported
    #[must_use]
    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    /// Number of records at exactly `level`
    #[must_use]
    pub fn count(&self, level: Level) -> usize {
        self.records.iter().filter(|r| r.level == level).count()
    }

    /// Messages reported at exactly `level`
    pub fn messages(&self, level: Level) -> impl Iterator<Item = &str> {
        self.records
            .iter()
            .filter(move |r| r.level == level)
            .map(|r| r.message.as_str())
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
