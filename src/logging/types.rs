//! The [`Log`] output trait shared by every logging backend.

/// Abstraction over output backends.
///
/// [`Logger`](super::logger::Logger) forwards to `tracing` for console and
/// log-file output; [`BufferedLog`](super::buffered::BufferedLog) keeps
/// messages in memory.  Engine code only ever sees `&dyn Log`.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a planned action that has not been applied.
    fn dry_run(&self, msg: &str);
    /// Show a question the user is about to be asked.
    fn prompt(&self, msg: &str);
}
