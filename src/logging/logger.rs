//! Structured logger backed by `tracing`.
use std::path::PathBuf;

use super::types::Log;
use super::utils::log_file_path;

/// Implement the methods of [`Log`] by delegating to inherent methods of the
/// same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Console and log-file logger.
///
/// Every message becomes a `tracing` event; the subscriber installed by
/// [`init_subscriber`](super::subscriber::init_subscriber) decides where it
/// goes.  All messages, debug included, are written to
/// `$XDG_CACHE_HOME/dotfiler/<command>.log` with ANSI codes stripped.
#[derive(Debug)]
pub struct Logger {
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a logger for `command`.
    ///
    /// The log file itself is created by the subscriber's file layer; this
    /// only remembers its path so it can be shown to the user.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            log_file: log_file_path(command),
        }
    }

    /// Create a logger whose log file lives at an explicit path.
    #[cfg(test)]
    pub(crate) const fn with_log_file(path: PathBuf) -> Self {
        Self {
            log_file: Some(path),
        }
    }

    /// Path of the persistent log file, if the cache directory is usable.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: "dotfiler::stage", "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a planned, not yet applied, action.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: "dotfiler::dry_run", "{msg}");
    }

    /// Show a confirmation question.
    pub fn prompt(&self, msg: &str) {
        tracing::info!(target: "dotfiler::prompt", "{msg}");
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run, prompt);
}
