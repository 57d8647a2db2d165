//! Subcommand handlers and the error-reporting boundary.
pub mod update;
pub mod version;

use crate::error::DotfilerError;
use crate::logging::Log;

/// How a failed run was reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// An expected failure, reported as a single line.
    Handled,
    /// Anything else, reported with its full context chain.
    Unexpected,
}

/// Report `err` to the user and classify it.
///
/// Expected failures ([`DotfilerError::is_handled`]) get one line naming the
/// problem; cancellation is a warning rather than an error.  Everything else
/// is shown with its whole `anyhow` context chain.
pub fn report_failure(err: &anyhow::Error, log: &dyn Log) -> Failure {
    match err.downcast_ref::<DotfilerError>() {
        Some(DotfilerError::UserCancelled) => {
            log.warn("User cancelled");
            Failure::Handled
        }
        Some(e) if e.is_handled() => {
            log.error(&e.to_string());
            Failure::Handled
        }
        _ => {
            log.error(&format!("The operation resulted in an error: {err:#}"));
            Failure::Unexpected
        }
    }
}
