//! Mutation pass: replace each applicable destination with a fresh link.
use super::Context;
use crate::error::DotfilerError;
use crate::manifest::{Operation, ResolvedPaths};
use crate::operations::FileSystemOps;

/// What the mutation pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    /// Links created on an empty destination.
    pub created: usize,
    /// Links that replaced an existing object.
    pub replaced: usize,
}

impl ApplySummary {
    /// Total number of links written.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.created + self.replaced
    }
}

/// Apply every applicable entry in manifest order.
///
/// Applicability and paths are recomputed from the manifest rather than
/// taken from a previous plan.  Stops at the first failure; entries already
/// applied stay applied.
///
/// # Errors
///
/// Returns [`DotfilerError::LinkRemoval`] or [`DotfilerError::LinkCreation`]
/// for the first entry that cannot be applied.
pub fn apply(ctx: &Context<'_>) -> Result<ApplySummary, DotfilerError> {
    let mut summary = ApplySummary::default();
    for (i, entry, paths) in ctx.resolved_entries() {
        let replaced = match entry.operation {
            Operation::Symlink => relink(ctx.fs, &paths)?,
        };
        if replaced {
            summary.replaced += 1;
        } else {
            summary.created += 1;
        }
        ctx.log.debug(&format!(
            "entry {}: linked {} -> {}",
            i + 1,
            paths.destination.display(),
            paths.source.display()
        ));
    }
    Ok(summary)
}

/// Make `paths.destination` a symlink to `paths.source`, removing whatever
/// is there first.  Returns whether something was removed.
///
/// # Errors
///
/// Returns [`DotfilerError::LinkCreation`] if the parent directory or the
/// link cannot be created, and [`DotfilerError::LinkRemoval`] if the
/// existing object cannot be removed.
pub fn relink(fs: &dyn FileSystemOps, paths: &ResolvedPaths) -> Result<bool, DotfilerError> {
    let creation_err = |source| DotfilerError::LinkCreation {
        destination: paths.destination.clone(),
        source_path: paths.source.clone(),
        source,
    };
    let removal_err = |source| DotfilerError::LinkRemoval {
        path: paths.destination.clone(),
        source,
    };

    if let Some(parent) = paths.destination.parent()
        && !parent.as_os_str().is_empty()
    {
        fs.create_dir_all(parent).map_err(creation_err)?;
    }

    let existing = fs.entry_kind(&paths.destination).map_err(removal_err)?;
    if existing.is_some() {
        fs.remove(&paths.destination).map_err(removal_err)?;
    }

    fs.symlink(&paths.source, &paths.destination)
        .map_err(creation_err)?;
    Ok(existing.is_some())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::BufferedLog;
    use crate::manifest::test_helpers::{entry, manifest};
    use crate::operations::{EntryKind, MockFileSystemOps};
    use crate::platform::Platform;
    use mockall::Sequence;
    use std::path::{Path, PathBuf};

    fn paths() -> ResolvedPaths {
        ResolvedPaths {
            source: PathBuf::from("/repo/a.txt"),
            destination: PathBuf::from("/home/u/A.txt"),
        }
    }

    #[test]
    fn relink_removes_then_creates() {
        let mut fs = MockFileSystemOps::new();
        let mut seq = Sequence::new();
        fs.expect_create_dir_all()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        fs.expect_entry_kind()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some(EntryKind::Symlink)));
        fs.expect_remove()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        fs.expect_symlink()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        assert!(relink(&fs, &paths()).unwrap());
    }

    #[test]
    fn relink_on_empty_destination_skips_removal() {
        let mut fs = MockFileSystemOps::new();
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_entry_kind().returning(|_| Ok(None));
        fs.expect_remove().never();
        fs.expect_symlink().times(1).returning(|_, _| Ok(()));

        assert!(!relink(&fs, &paths()).unwrap());
    }

    #[test]
    fn removal_failure_is_link_removal_error() {
        let mut fs = MockFileSystemOps::new();
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_entry_kind()
            .returning(|_| Ok(Some(EntryKind::Symlink)));
        fs.expect_remove()
            .returning(|_| Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied)));
        fs.expect_symlink().never();

        let err = relink(&fs, &paths()).unwrap_err();
        assert!(matches!(err, DotfilerError::LinkRemoval { .. }));
    }

    #[test]
    fn creation_failure_is_link_creation_error() {
        let mut fs = MockFileSystemOps::new();
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_entry_kind().returning(|_| Ok(None));
        fs.expect_symlink()
            .returning(|_, _| Err(std::io::Error::from(std::io::ErrorKind::AlreadyExists)));

        let err = relink(&fs, &paths()).unwrap_err();
        assert!(matches!(err, DotfilerError::LinkCreation { .. }));
    }

    #[test]
    fn apply_stops_at_first_failure() {
        let mut fs = MockFileSystemOps::new();
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_entry_kind().returning(|_| Ok(None));
        fs.expect_symlink()
            .withf(|_, link| link.ends_with("A.txt"))
            .times(1)
            .returning(|_, _| Ok(()));
        fs.expect_symlink()
            .withf(|_, link| link.ends_with("B.txt"))
            .times(1)
            .returning(|_, _| Err(std::io::Error::other("disk full")));
        fs.expect_symlink()
            .withf(|_, link| link.ends_with("C.txt"))
            .never();

        let m = manifest(
            Path::new("/repo"),
            vec![
                entry("a", "A.txt", &["linux"], &["amd64"]),
                entry("b", "B.txt", &["linux"], &["amd64"]),
                entry("c", "C.txt", &["linux"], &["amd64"]),
            ],
        );
        let platform = Platform::new("linux", "amd64");
        let log = BufferedLog::new();
        let ctx = Context::new(&m, &platform, Path::new("/home/u"), &log, &fs);

        let err = apply(&ctx).unwrap_err();
        assert!(matches!(
            err,
            DotfilerError::LinkCreation { ref destination, .. } if destination.ends_with("B.txt")
        ));
    }

    #[test]
    fn apply_skips_entries_for_other_platforms() {
        let mut fs = MockFileSystemOps::new();
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_entry_kind().returning(|_| Ok(None));
        fs.expect_symlink()
            .withf(|_, link| link.ends_with("A.txt"))
            .times(1)
            .returning(|_, _| Ok(()));

        let m = manifest(
            Path::new("/repo"),
            vec![
                entry("a", "A.txt", &["linux"], &["amd64"]),
                entry("b", "B.txt", &["darwin"], &["arm64"]),
            ],
        );
        let platform = Platform::new("linux", "amd64");
        let log = BufferedLog::new();
        let ctx = Context::new(&m, &platform, Path::new("/home/u"), &log, &fs);

        let summary = apply(&ctx).unwrap();
        assert_eq!(summary, ApplySummary { created: 1, replaced: 0 });
    }

    #[cfg(unix)]
    #[test]
    fn apply_recreates_dangling_link_on_real_filesystem() {
        use crate::operations::SystemFileSystemOps;

        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        std::fs::write(src.path().join("a.txt"), "a").unwrap();
        std::os::unix::fs::symlink("/nonexistent", dst.path().join("A.txt")).unwrap();

        let m = manifest(
            src.path(),
            vec![entry("a.txt", "A.txt", &["linux"], &["amd64"])],
        );
        let platform = Platform::new("linux", "amd64");
        let log = BufferedLog::new();
        let ctx = Context::new(&m, &platform, dst.path(), &log, &SystemFileSystemOps);

        let summary = apply(&ctx).unwrap();
        assert_eq!(summary.replaced, 1);
        assert_eq!(
            std::fs::read_link(dst.path().join("A.txt")).unwrap(),
            src.path().join("a.txt")
        );
    }
}
