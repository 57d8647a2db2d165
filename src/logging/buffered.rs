//! In-memory logger that records messages for later inspection.
use std::sync::Mutex;

use super::types::Log;

/// Severity/kind of a buffered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// A stage header.
    Stage,
    /// An informational message.
    Info,
    /// A debug message.
    Debug,
    /// A warning.
    Warn,
    /// An error.
    Error,
    /// A planned action.
    DryRun,
    /// A confirmation question.
    Prompt,
}

/// A single buffered log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Kind of message.
    pub level: LogLevel,
    /// Message text.
    pub message: String,
}

/// Implement the methods of [`Log`] by buffering each message with the
/// corresponding [`LogLevel`].
macro_rules! buffer_log_methods {
    ($($method:ident => $level:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.push(LogLevel::$level, msg);
            }
        )+
    };
}

/// Logger that keeps every message in memory.
///
/// Used to capture engine output (e.g. a plan preview) without writing to
/// the console, and to assert on that output in tests.
#[derive(Debug, Default)]
pub struct BufferedLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl BufferedLog {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, level: LogLevel, msg: &str) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.push(LogEntry {
                level,
                message: msg.to_string(),
            });
        }
    }

    /// All entries recorded so far, in order.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Messages recorded at `level`, in order.
    #[must_use]
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|e| e.level == level)
            .map(|e| e.message)
            .collect()
    }

    /// Warning messages recorded so far.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        self.messages(LogLevel::Warn)
    }

    /// Whether any recorded message contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.entries().iter().any(|e| e.message.contains(needle))
    }
}

impl Log for BufferedLog {
    buffer_log_methods! {
        stage   => Stage,
        info    => Info,
        debug   => Debug,
        warn    => Warn,
        error   => Error,
        dry_run => DryRun,
        prompt  => Prompt,
    }
}
