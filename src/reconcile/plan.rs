//! Dry-run pass: classify every applicable destination without touching it.
use std::path::{Path, PathBuf};

use super::Context;
use crate::error::DotfilerError;
use crate::logging::Log;
use crate::manifest::{Operation, ResolvedPaths};
use crate::operations::{EntryKind, FileSystemOps};

/// What currently occupies a destination path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationState {
    /// Nothing exists at the destination; its parent directory does.
    Absent,
    /// Nothing exists at the destination and its parent directory is missing.
    MissingParent,
    /// A symbolic link exists (valid, dangling, or pointing elsewhere).
    ExistingLink {
        /// Where the existing link points, when readable.
        target: Option<PathBuf>,
    },
    /// Something other than a symbolic link exists.
    ExistingNonLink {
        /// What kind of object is in the way.
        kind: EntryKind,
    },
    /// Nothing exists at the destination, but an ancestor that should be a
    /// directory is something else (a file, or a link not leading to one).
    BlockedParent {
        /// The nearest existing ancestor.
        ancestor: PathBuf,
        /// What that ancestor is, without following links.
        kind: EntryKind,
    },
}

impl DestinationState {
    /// Whether this state blocks the whole run.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::ExistingNonLink { .. } | Self::BlockedParent { .. }
        )
    }
}

/// The planned outcome for one applicable entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedLink {
    /// 1-based position of the entry in the manifest.
    pub entry: usize,
    /// Operation the entry declares.
    pub operation: Operation,
    /// Resolved source and destination.
    pub paths: ResolvedPaths,
    /// Current state of the destination.
    pub state: DestinationState,
    /// Whether the source exists (following links).
    pub source_exists: bool,
}

impl PlannedLink {
    /// One-line human-readable description of what will happen.
    #[must_use]
    pub fn describe(&self) -> String {
        let dst = self.paths.destination.display();
        let src = self.paths.source.display();
        match &self.state {
            DestinationState::Absent => format!("will create new link {dst} -> {src}"),
            DestinationState::MissingParent => format!(
                "will create new link {dst} -> {src} (parent directory will be created)"
            ),
            DestinationState::ExistingLink { target: Some(old) } => format!(
                "will recreate link {dst} -> {src} (currently -> {})",
                old.display()
            ),
            DestinationState::ExistingLink { target: None } => {
                format!("will recreate link {dst} -> {src}")
            }
            DestinationState::ExistingNonLink { kind } => {
                format!("conflict: {dst} exists and is a {kind}, not a symbolic link")
            }
            DestinationState::BlockedParent { ancestor, kind } => format!(
                "conflict: cannot create {dst}, {} is a {kind} that does not lead to a directory",
                ancestor.display()
            ),
        }
    }
}

/// Result of the dry-run pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    /// One planned link per applicable entry, in manifest order.
    pub links: Vec<PlannedLink>,
}

impl Plan {
    /// Destinations that conflict, in manifest order.
    #[must_use]
    pub fn conflicts(&self) -> Vec<PathBuf> {
        self.links
            .iter()
            .filter(|l| l.state.is_conflict())
            .map(|l| l.paths.destination.clone())
            .collect()
    }

    /// Whether no entry applies to this run.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Write the plan to `log`: planned actions as dry-run lines, conflicts
    /// as errors, missing sources as warnings.
    pub fn report(&self, log: &dyn Log) {
        for link in &self.links {
            if !link.source_exists {
                log.warn(&format!(
                    "source does not exist: {}",
                    link.paths.source.display()
                ));
            }
            if link.state.is_conflict() {
                log.error(&link.describe());
            } else {
                log.dry_run(&link.describe());
            }
        }
    }
}

/// Classify `destination` without following a final symlink.
///
/// When nothing exists there, the nearest existing ancestor must be a
/// directory (links followed), or the link could never be created.
///
/// # Errors
///
/// Returns [`DotfilerError::DestinationInspect`] if the destination or one
/// of its ancestors cannot be inspected.
pub fn inspect(fs: &dyn FileSystemOps, destination: &Path) -> Result<DestinationState, DotfilerError> {
    match fs
        .entry_kind(destination)
        .map_err(inspect_err(destination))?
    {
        Some(EntryKind::Symlink) => Ok(DestinationState::ExistingLink {
            target: fs.read_link(destination).ok(),
        }),
        Some(kind) => Ok(DestinationState::ExistingNonLink { kind }),
        None => inspect_ancestors(fs, destination),
    }
}

fn inspect_ancestors(fs: &dyn FileSystemOps, destination: &Path) -> Result<DestinationState, DotfilerError> {
    let mut missing = false;
    let ancestors = destination
        .ancestors()
        .skip(1)
        .take_while(|a| !a.as_os_str().is_empty());
    for ancestor in ancestors {
        match fs.entry_kind(ancestor).map_err(inspect_err(ancestor))? {
            None => missing = true,
            Some(_) if fs.is_dir(ancestor) => break,
            Some(kind) => {
                return Ok(DestinationState::BlockedParent {
                    ancestor: ancestor.to_path_buf(),
                    kind,
                });
            }
        }
    }
    Ok(if missing {
        DestinationState::MissingParent
    } else {
        DestinationState::Absent
    })
}

fn inspect_err(path: &Path) -> impl FnOnce(std::io::Error) -> DotfilerError + use<> {
    let path = path.to_path_buf();
    move |source: std::io::Error| DotfilerError::DestinationInspect { path, source }
}

/// Inspect every applicable entry and build the plan.
///
/// Never mutates the filesystem.
///
/// # Errors
///
/// Returns [`DotfilerError::DestinationInspect`] if a destination cannot be
/// inspected.
pub fn build(ctx: &Context<'_>) -> Result<Plan, DotfilerError> {
    let mut links = Vec::new();
    for (i, entry, paths) in ctx.resolved_entries() {
        let state = inspect(ctx.fs, &paths.destination)?;
        let source_exists = ctx.fs.exists(&paths.source);
        links.push(PlannedLink {
            entry: i + 1,
            operation: entry.operation,
            paths,
            state,
            source_exists,
        });
    }

    let filtered = ctx.manifest.len() - links.len();
    if filtered > 0 {
        ctx.log.debug(&format!(
            "{filtered} entr{} not applicable to {}",
            if filtered == 1 { "y is" } else { "ies are" },
            ctx.platform
        ));
    }
    Ok(Plan { links })
}

/// Build the plan, report it, and fail if any destination conflicts.
///
/// Every applicable entry is reported before a conflict fails the run, so
/// the user sees all of them at once.
///
/// # Errors
///
/// Returns [`DotfilerError::DestinationConflict`] listing every conflicting
/// destination, or any error from [`build`].
pub fn preview(ctx: &Context<'_>) -> Result<Plan, DotfilerError> {
    let plan = build(ctx)?;
    plan.report(ctx.log);

    let destinations = plan.conflicts();
    if !destinations.is_empty() {
        return Err(DotfilerError::DestinationConflict { destinations });
    }
    Ok(plan)
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::logging::{BufferedLog, LogLevel};
    use crate::manifest::test_helpers::{entry, manifest};
    use crate::operations::{MockFileSystemOps, SystemFileSystemOps};
    use crate::platform::Platform;

    fn linux() -> Platform {
        Platform::new("linux", "amd64")
    }

    fn render(plan: &Plan) -> String {
        plan.links
            .iter()
            .map(|l| format!("{}\n", l.describe()))
            .collect()
    }

    fn planned(dst: &str, state: DestinationState) -> PlannedLink {
        PlannedLink {
            entry: 1,
            operation: Operation::Symlink,
            paths: ResolvedPaths {
                source: PathBuf::from("/repo/a.txt"),
                destination: PathBuf::from(dst),
            },
            state,
            source_exists: true,
        }
    }

    #[cfg(unix)]
    #[test]
    fn render_describes_each_state() {
        let plan = Plan {
            links: vec![
                planned("/home/u/A.txt", DestinationState::Absent),
                planned("/home/u/.config/x/A.txt", DestinationState::MissingParent),
                planned(
                    "/home/u/B.txt",
                    DestinationState::ExistingLink {
                        target: Some(PathBuf::from("/gone")),
                    },
                ),
                planned(
                    "/home/u/C.txt",
                    DestinationState::ExistingNonLink {
                        kind: EntryKind::File,
                    },
                ),
                planned(
                    "/home/u/cfg/D.txt",
                    DestinationState::BlockedParent {
                        ancestor: PathBuf::from("/home/u/cfg"),
                        kind: EntryKind::Symlink,
                    },
                ),
            ],
        };
        insta::assert_snapshot!(render(&plan), @r"
        will create new link /home/u/A.txt -> /repo/a.txt
        will create new link /home/u/.config/x/A.txt -> /repo/a.txt (parent directory will be created)
        will recreate link /home/u/B.txt -> /repo/a.txt (currently -> /gone)
        conflict: /home/u/C.txt exists and is a regular file, not a symbolic link
        conflict: cannot create /home/u/cfg/D.txt, /home/u/cfg is a symbolic link that does not lead to a directory
        ");
    }

    #[test]
    fn inspect_absent_destination() {
        let mut fs = MockFileSystemOps::new();
        fs.expect_entry_kind()
            .withf(|p| p.ends_with("A.txt"))
            .returning(|_| Ok(None));
        fs.expect_entry_kind()
            .withf(|p| p.ends_with("u"))
            .returning(|_| Ok(Some(EntryKind::Directory)));
        fs.expect_is_dir().returning(|_| true);
        assert_eq!(
            inspect(&fs, Path::new("/home/u/A.txt")).unwrap(),
            DestinationState::Absent
        );
    }

    #[test]
    fn inspect_parent_linked_to_directory_is_absent() {
        let mut fs = MockFileSystemOps::new();
        fs.expect_entry_kind()
            .withf(|p| p.ends_with("A.txt"))
            .returning(|_| Ok(None));
        fs.expect_entry_kind()
            .withf(|p| p.ends_with("cfg"))
            .returning(|_| Ok(Some(EntryKind::Symlink)));
        fs.expect_is_dir()
            .withf(|p| p.ends_with("cfg"))
            .returning(|_| true);
        assert_eq!(
            inspect(&fs, Path::new("/home/u/cfg/A.txt")).unwrap(),
            DestinationState::Absent
        );
    }

    #[test]
    fn inspect_dangling_parent_link_is_conflict() {
        let mut fs = MockFileSystemOps::new();
        fs.expect_entry_kind()
            .withf(|p| p.ends_with("B.txt"))
            .returning(|_| Ok(None));
        fs.expect_entry_kind()
            .withf(|p| p.ends_with("cfg"))
            .returning(|_| Ok(Some(EntryKind::Symlink)));
        fs.expect_is_dir().returning(|_| false);
        let state = inspect(&fs, Path::new("/home/u/cfg/B.txt")).unwrap();
        assert_eq!(
            state,
            DestinationState::BlockedParent {
                ancestor: PathBuf::from("/home/u/cfg"),
                kind: EntryKind::Symlink,
            }
        );
        assert!(state.is_conflict());
    }

    #[test]
    fn inspect_file_above_missing_parent_is_conflict() {
        let mut fs = MockFileSystemOps::new();
        fs.expect_entry_kind()
            .withf(|p| p.ends_with("B.txt") || p.ends_with("sub"))
            .returning(|_| Ok(None));
        fs.expect_entry_kind()
            .withf(|p| p.ends_with("cfg"))
            .returning(|_| Ok(Some(EntryKind::File)));
        fs.expect_is_dir().returning(|_| false);
        assert_eq!(
            inspect(&fs, Path::new("/home/u/cfg/sub/B.txt")).unwrap(),
            DestinationState::BlockedParent {
                ancestor: PathBuf::from("/home/u/cfg"),
                kind: EntryKind::File,
            }
        );
    }

    #[cfg(unix)]
    #[test]
    fn dangling_parent_link_fails_preview_before_anything_is_applied() {
        let dst = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink("/nonexistent/dir", dst.path().join("cfg")).unwrap();
        let m = manifest(
            Path::new("/repo"),
            vec![
                entry("a.txt", "A.txt", &["linux"], &["amd64"]),
                entry("b.txt", "cfg/B.txt", &["linux"], &["amd64"]),
            ],
        );
        let platform = linux();
        let log = BufferedLog::new();
        let ctx = Context::new(&m, &platform, dst.path(), &log, &SystemFileSystemOps);

        let err = preview(&ctx).unwrap_err();
        assert!(matches!(
            err,
            DotfilerError::DestinationConflict { ref destinations }
                if destinations == &vec![dst.path().join("cfg/B.txt")]
        ));
        assert!(log.messages(LogLevel::Error)[0].contains("does not lead to a directory"));
        assert!(dst.path().join("A.txt").symlink_metadata().is_err());
    }

    #[test]
    fn inspect_missing_parent() {
        let mut fs = MockFileSystemOps::new();
        fs.expect_entry_kind().returning(|_| Ok(None));
        assert_eq!(
            inspect(&fs, Path::new("/home/u/.config/A.txt")).unwrap(),
            DestinationState::MissingParent
        );
    }

    #[test]
    fn inspect_existing_link_reads_target() {
        let mut fs = MockFileSystemOps::new();
        fs.expect_entry_kind()
            .returning(|_| Ok(Some(EntryKind::Symlink)));
        fs.expect_read_link()
            .returning(|_| Ok(PathBuf::from("/elsewhere")));
        assert_eq!(
            inspect(&fs, Path::new("/home/u/A.txt")).unwrap(),
            DestinationState::ExistingLink {
                target: Some(PathBuf::from("/elsewhere"))
            }
        );
    }

    #[test]
    fn inspect_directory_is_conflict() {
        let mut fs = MockFileSystemOps::new();
        fs.expect_entry_kind()
            .returning(|_| Ok(Some(EntryKind::Directory)));
        let state = inspect(&fs, Path::new("/home/u/.config")).unwrap();
        assert!(state.is_conflict());
    }

    #[test]
    fn inspect_error_is_reported_with_path() {
        let mut fs = MockFileSystemOps::new();
        fs.expect_entry_kind()
            .returning(|_| Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied)));
        let err = inspect(&fs, Path::new("/root/secret")).unwrap_err();
        assert!(matches!(
            err,
            DotfilerError::DestinationInspect { ref path, .. } if path == Path::new("/root/secret")
        ));
    }

    #[test]
    fn preview_never_mutates() {
        let mut fs = MockFileSystemOps::new();
        fs.expect_entry_kind().returning(|_| Ok(None));
        fs.expect_exists().returning(|_| true);
        fs.expect_remove().never();
        fs.expect_create_dir_all().never();
        fs.expect_symlink().never();

        let m = manifest(
            Path::new("/repo"),
            vec![entry("a.txt", "x/A.txt", &["linux"], &["amd64"])],
        );
        let platform = linux();
        let log = BufferedLog::new();
        let ctx = Context::new(&m, &platform, Path::new("/home/u"), &log, &fs);
        let plan = preview(&ctx).unwrap();
        assert_eq!(plan.links.len(), 1);
        assert_eq!(plan.links[0].state, DestinationState::MissingParent);
    }

    #[test]
    fn filtered_entries_produce_no_plan_line() {
        let dst = tempfile::tempdir().unwrap();
        let m = manifest(
            Path::new("/repo"),
            vec![entry("a.txt", "A.txt", &["linux"], &["amd64"])],
        );
        let platform = Platform::new("darwin", "arm64");
        let log = BufferedLog::new();
        let ctx = Context::new(&m, &platform, dst.path(), &log, &SystemFileSystemOps);
        let plan = preview(&ctx).unwrap();
        assert!(plan.is_empty());
        assert!(log.messages(LogLevel::DryRun).is_empty());
        assert!(log.contains("1 entry is not applicable to darwin/arm64"));
    }

    #[test]
    fn missing_source_is_only_a_warning() {
        let dst = tempfile::tempdir().unwrap();
        let src = tempfile::tempdir().unwrap();
        let m = manifest(
            src.path(),
            vec![entry("missing.txt", "A.txt", &["linux"], &["amd64"])],
        );
        let platform = linux();
        let log = BufferedLog::new();
        let ctx = Context::new(&m, &platform, dst.path(), &log, &SystemFileSystemOps);
        let plan = preview(&ctx).unwrap();
        assert!(!plan.links[0].source_exists);
        assert_eq!(plan.links[0].state, DestinationState::Absent);
        assert_eq!(log.warnings().len(), 1);
        assert!(log.warnings()[0].contains("source does not exist"));
    }

    #[test]
    fn conflict_is_reported_for_every_entry_before_failing() {
        let dst = tempfile::tempdir().unwrap();
        std::fs::write(dst.path().join("A.txt"), "mine").unwrap();
        std::fs::create_dir(dst.path().join("C")).unwrap();
        let m = manifest(
            Path::new("/repo"),
            vec![
                entry("a", "A.txt", &["linux"], &["amd64"]),
                entry("b", "B.txt", &["linux"], &["amd64"]),
                entry("c", "C", &["linux"], &["amd64"]),
            ],
        );
        let platform = linux();
        let log = BufferedLog::new();
        let ctx = Context::new(&m, &platform, dst.path(), &log, &SystemFileSystemOps);

        let err = preview(&ctx).unwrap_err();
        match err {
            DotfilerError::DestinationConflict { destinations } => {
                assert_eq!(
                    destinations,
                    vec![dst.path().join("A.txt"), dst.path().join("C")]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(log.messages(LogLevel::Error).len(), 2);
        assert_eq!(log.messages(LogLevel::DryRun).len(), 1);
        assert_eq!(std::fs::read_to_string(dst.path().join("A.txt")).unwrap(), "mine");
    }
}
