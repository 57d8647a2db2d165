//! The two-pass reconciliation engine.
//!
//! A run is a read-only [`plan`] pass over every applicable entry, a single
//! [`confirm`] gate, and an [`apply`] pass that recomputes everything from
//! the same manifest and mutates the filesystem.
pub mod apply;
pub mod confirm;
pub mod plan;

use std::path::{Path, PathBuf};

use crate::logging::Log;
use crate::manifest::{LinkEntry, Manifest, ResolvedPaths};
use crate::operations::FileSystemOps;
use crate::platform::Platform;

pub use apply::{ApplySummary, apply};
pub use confirm::confirm;
pub use plan::{DestinationState, Plan, PlannedLink, preview};

/// Everything a pass needs to evaluate the manifest.
pub struct Context<'a> {
    /// The loaded manifest.
    pub manifest: &'a Manifest,
    /// Platform entries are filtered against.
    pub platform: &'a Platform,
    /// Base directory destinations resolve against.
    pub destination_root: PathBuf,
    /// Output sink.
    pub log: &'a dyn Log,
    /// Filesystem access.
    pub fs: &'a dyn FileSystemOps,
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("manifest", &self.manifest)
            .field("platform", &self.platform)
            .field("destination_root", &self.destination_root)
            .field("log", &"<dyn Log>")
            .field("fs", &"<dyn FileSystemOps>")
            .finish()
    }
}

impl<'a> Context<'a> {
    /// Creates a new context.
    #[must_use]
    pub fn new(
        manifest: &'a Manifest,
        platform: &'a Platform,
        destination_root: &Path,
        log: &'a dyn Log,
        fs: &'a dyn FileSystemOps,
    ) -> Self {
        Self {
            manifest,
            platform,
            destination_root: destination_root.to_path_buf(),
            log,
            fs,
        }
    }

    /// Applicable entries with their freshly resolved paths, in manifest order.
    pub fn resolved_entries(
        &self,
    ) -> impl Iterator<Item = (usize, &'a LinkEntry, ResolvedPaths)> + '_ {
        self.manifest.applicable(self.platform).map(move |(i, entry)| {
            let paths = entry.resolve(&self.manifest.source_dir, &self.destination_root);
            (i, entry, paths)
        })
    }
}
