//! Domain-specific error types for the reconciliation engine.
//!
//! Core modules return [`DotfilerError`] directly.  Command handlers at the
//! CLI boundary convert it to [`anyhow::Error`] via the standard `?`
//! operator, and [`crate::commands::report_failure`] downcasts it back to
//! decide how loudly to report a failure.
//!
//! # Error groups
//!
//! ```text
//! DotfilerError
//! ├── loading    : ManifestNotFound, ManifestRead, ManifestParse, UnsupportedOperation
//! ├── planning   : DestinationConflict, DestinationInspect
//! ├── environment: HomeDirectoryUnavailable, Input
//! ├── mutation   : LinkRemoval, LinkCreation
//! └── outcome    : UserCancelled
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Every failure the engine can report.
#[derive(Error, Debug)]
pub enum DotfilerError {
    /// No manifest file exists at the resolved location.
    #[error("A manifest file was not found at the given location: {}", path.display())]
    ManifestNotFound {
        /// Resolved manifest path.
        path: PathBuf,
    },

    /// The manifest exists but could not be opened or read.
    #[error("reading manifest file {}", path.display())]
    ManifestRead {
        /// Resolved manifest path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The manifest content is not a sequence of link records.
    #[error("deserializing manifest file {}", path.display())]
    ManifestParse {
        /// Resolved manifest path.
        path: PathBuf,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },

    /// An entry names an operation outside the supported set.
    #[error("Unexpected file operation: {op} in entry {entry} (expected operations: {expected})")]
    UnsupportedOperation {
        /// The offending `op` value.
        op: String,
        /// 1-based position of the entry in the manifest.
        entry: usize,
        /// Comma-separated list of supported operations.
        expected: String,
    },

    /// One or more destinations exist and are not symbolic links.
    #[error("{} destination(s) exist and are not symbolic links: {}", destinations.len(), join_paths(destinations))]
    DestinationConflict {
        /// Every conflicting destination, in manifest order.
        destinations: Vec<PathBuf>,
    },

    /// A destination could not be inspected.
    #[error("inspecting destination {}", path.display())]
    DestinationInspect {
        /// Destination that could not be inspected.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// No destination root was given and the home directory is unknown.
    #[error("Could not determine the destination directory: {reason}")]
    HomeDirectoryUnavailable {
        /// Why the home directory could not be determined.
        reason: String,
    },

    /// Reading the confirmation key failed.
    #[error("getting keystroke")]
    Input(#[source] std::io::Error),

    /// An existing destination could not be removed.
    #[error("removing existing link {}", path.display())]
    LinkRemoval {
        /// Destination that could not be removed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The symbolic link (or its parent directory) could not be created.
    #[error("creating symlink {} -> {}", destination.display(), source_path.display())]
    LinkCreation {
        /// Where the link was to be created.
        destination: PathBuf,
        /// What the link was to point at.
        source_path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The user declined the confirmation prompt.
    #[error("User cancelled")]
    UserCancelled,
}

impl DotfilerError {
    /// Whether this failure is an expected outcome that has a user-facing
    /// message of its own and needs no further error context.
    #[must_use]
    pub const fn is_handled(&self) -> bool {
        matches!(
            self,
            Self::ManifestNotFound { .. }
                | Self::UnsupportedOperation { .. }
                | Self::DestinationConflict { .. }
                | Self::HomeDirectoryUnavailable { .. }
                | Self::UserCancelled
        )
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
