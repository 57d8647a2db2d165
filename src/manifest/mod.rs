//! The manifest model: declared link entries and their resolved paths.
pub mod filter;
pub mod loader;
pub mod validation;

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::DotfilerError;
use crate::platform::Platform;

pub use loader::{MANIFEST_FILE_NAME, load, resolve_path};

/// Kind of filesystem operation an entry declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Create a symbolic link at the destination pointing at the source.
    Symlink,
}

impl Operation {
    /// Every operation a manifest may use.
    pub const SUPPORTED: &'static [Self] = &[Self::Symlink];

    /// The identifier used for this operation in manifest files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Symlink => "symlink",
        }
    }

    /// Comma-separated identifiers of [`Self::SUPPORTED`].
    #[must_use]
    pub fn supported_list() -> String {
        Self::SUPPORTED
            .iter()
            .map(|op| op.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::SUPPORTED
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// One declared link operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    /// What to do.
    pub operation: Operation,
    /// Source path, relative to the manifest's directory.
    pub source_path: PathBuf,
    /// Destination path, relative to the destination root.
    pub destination_path: PathBuf,
    /// Operating systems this entry applies to.
    pub target_platforms: BTreeSet<String>,
    /// CPU architectures this entry applies to.
    pub target_architectures: BTreeSet<String>,
}

/// Absolute source and destination of an entry for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// What the link points at.
    pub source: PathBuf,
    /// Where the link lives.
    pub destination: PathBuf,
}

impl LinkEntry {
    /// Join this entry's relative paths onto the source and destination roots.
    #[must_use]
    pub fn resolve(&self, source_dir: &Path, destination_root: &Path) -> ResolvedPaths {
        ResolvedPaths {
            source: source_dir.join(&self.source_path),
            destination: destination_root.join(&self.destination_path),
        }
    }
}

/// An ordered, immutable list of entries and the directory they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Directory containing the manifest file; sources resolve against it.
    pub source_dir: PathBuf,
    /// Entries in file order.
    pub entries: Vec<LinkEntry>,
}

impl Manifest {
    /// Entries that apply to `platform`, with their 0-based manifest index,
    /// in manifest order.
    pub fn applicable<'a>(
        &'a self,
        platform: &'a Platform,
    ) -> impl Iterator<Item = (usize, &'a LinkEntry)> + 'a {
        self.entries
            .iter()
            .enumerate()
            .filter(move |(_, entry)| filter::applies(entry, platform))
    }

    /// Number of entries in the manifest.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manifest declares no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse the `op` field of the entry at 1-based position `entry`.
///
/// # Errors
///
/// Returns [`DotfilerError::UnsupportedOperation`] for any value outside
/// [`Operation::SUPPORTED`].
pub fn parse_operation(op: &str, entry: usize) -> Result<Operation, DotfilerError> {
    op.parse()
        .map_err(|op| DotfilerError::UnsupportedOperation {
            op,
            entry,
            expected: Operation::supported_list(),
        })
}


#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::test_helpers::{entry, manifest};
    use super::*;

    #[test]
    fn operation_parses_only_supported_values() {
        assert_eq!("symlink".parse::<Operation>(), Ok(Operation::Symlink));
        assert_eq!("copy".parse::<Operation>(), Err("copy".to_string()));
        assert_eq!("Symlink".parse::<Operation>(), Err("Symlink".to_string()));
    }

    #[test]
    fn parse_operation_reports_entry_position() {
        let err = parse_operation("hardlink", 2).unwrap_err();
        assert!(matches!(
            err,
            DotfilerError::UnsupportedOperation { ref op, entry: 2, ref expected }
                if op == "hardlink" && expected == "symlink"
        ));
    }

    #[test]
    fn resolve_joins_roots() {
        let e = entry("config/git", ".gitconfig", &["linux"], &["amd64"]);
        let paths = e.resolve(Path::new("/repo"), Path::new("/home/u"));
        assert_eq!(paths.source, PathBuf::from("/repo/config/git"));
        assert_eq!(paths.destination, PathBuf::from("/home/u/.gitconfig"));
    }

    #[test]
    fn applicable_preserves_order_and_indices() {
        let m = manifest(
            Path::new("/repo"),
            vec![
                entry("a", "A", &["linux"], &["amd64"]),
                entry("b", "B", &["darwin"], &["arm64"]),
                entry("c", "C", &["linux", "darwin"], &["amd64", "arm64"]),
            ],
        );
        let platform = Platform::new("linux", "amd64");
        let picked: Vec<(usize, &str)> = m
            .applicable(&platform)
            .map(|(i, e)| (i, e.destination_path.to_str().unwrap()))
            .collect();
        assert_eq!(picked, vec![(0, "A"), (2, "C")]);
    }
}
