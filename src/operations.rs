//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so the plan and apply passes can be
//! unit-tested without touching the real filesystem.  Production code uses
//! [`SystemFileSystemOps`]; unit tests use the generated `MockFileSystemOps`.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// What kind of object occupies a path, without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A symbolic link (valid or dangling).
    Symlink,
    /// A regular file.
    File,
    /// A real directory.
    Directory,
    /// Anything else (socket, fifo, device, …).
    Other,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symlink => write!(f, "symbolic link"),
            Self::File => write!(f, "regular file"),
            Self::Directory => write!(f, "directory"),
            Self::Other => write!(f, "special file"),
        }
    }
}

/// Abstraction over the filesystem calls the engine makes.
#[cfg_attr(test, mockall::automock)]
pub trait FileSystemOps {
    /// Inspect `path` without following a final symlink.
    ///
    /// Returns `Ok(None)` when nothing exists at `path`, including when an
    /// ancestor of `path` is not a directory.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than "not found".
    fn entry_kind(&self, path: &Path) -> io::Result<Option<EntryKind>>;

    /// Returns `true` if `path` exists, following symlinks.
    fn exists(&self, path: &Path) -> bool;

    /// Returns `true` if `path` is a directory, following symlinks.
    fn is_dir(&self, path: &Path) -> bool;

    /// Read the target of the symbolic link at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a symlink or cannot be read.
    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;

    /// Remove the file, symlink, or empty directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails.
    fn remove(&self, path: &Path) -> io::Result<()>;

    /// Create `path` and any missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create a symbolic link at `link` pointing to `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the link cannot be created.
    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn entry_kind(&self, path: &Path) -> io::Result<Option<EntryKind>> {
        match std::fs::symlink_metadata(path) {
            Ok(meta) => {
                let ty = meta.file_type();
                let kind = if ty.is_symlink() {
                    EntryKind::Symlink
                } else if ty.is_file() {
                    EntryKind::File
                } else if ty.is_dir() {
                    EntryKind::Directory
                } else {
                    EntryKind::Other
                };
                Ok(Some(kind))
            }
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
                ) =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::read_link(path)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        let meta = std::fs::symlink_metadata(path)?;
        if is_dir_like(&meta) {
            std::fs::remove_dir(path)
        } else {
            std::fs::remove_file(path)
        }
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(target, link)
        }

        #[cfg(windows)]
        {
            if target.is_dir() {
                std::os::windows::fs::symlink_dir(target, link)
            } else {
                std::os::windows::fs::symlink_file(target, link)
            }
        }
    }
}

/// Check if metadata represents a directory-like entry.
///
/// On Windows, `symlink_metadata().is_dir()` returns `false` for directory
/// symlinks, which must still be removed with `remove_dir`, so the raw
/// `FILE_ATTRIBUTE_DIRECTORY` bit is checked instead.
fn is_dir_like(meta: &std::fs::Metadata) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        meta.file_attributes() & 0x10 != 0 // FILE_ATTRIBUTE_DIRECTORY
    }
    #[cfg(not(windows))]
    {
        meta.is_dir()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn entry_kind_of_missing_path_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let ops = SystemFileSystemOps;
        assert_eq!(ops.entry_kind(&dir.path().join("absent")).unwrap(), None);
    }

    #[test]
    fn entry_kind_distinguishes_file_and_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file");
        std::fs::write(&file, "x").unwrap();
        let ops = SystemFileSystemOps;
        assert_eq!(ops.entry_kind(&file).unwrap(), Some(EntryKind::File));
        assert_eq!(
            ops.entry_kind(dir.path()).unwrap(),
            Some(EntryKind::Directory)
        );
    }

    #[cfg(unix)]
    #[test]
    fn entry_kind_does_not_follow_dangling_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink("/nonexistent/target", &link).unwrap();
        let ops = SystemFileSystemOps;
        assert_eq!(ops.entry_kind(&link).unwrap(), Some(EntryKind::Symlink));
        assert!(!ops.exists(&link));
    }

    #[cfg(unix)]
    #[test]
    fn remove_deletes_symlink_but_not_its_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("target");
        let link = dir.path().join("link");
        std::fs::write(&target, "keep").unwrap();
        let ops = SystemFileSystemOps;
        ops.symlink(&target, &link).unwrap();
        assert_eq!(ops.read_link(&link).unwrap(), target);

        ops.remove(&link).unwrap();
        assert_eq!(ops.entry_kind(&link).unwrap(), None);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "keep");
    }

    #[test]
    fn entry_kind_below_a_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file");
        std::fs::write(&file, "x").unwrap();
        let ops = SystemFileSystemOps;
        assert_eq!(ops.entry_kind(&file.join("child")).unwrap(), None);
        assert!(!ops.is_dir(&file));
    }

    #[cfg(unix)]
    #[test]
    fn is_dir_follows_links() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good");
        let dangling = dir.path().join("dangling");
        std::os::unix::fs::symlink(dir.path(), &good).unwrap();
        std::os::unix::fs::symlink("/nonexistent/dir", &dangling).unwrap();
        let ops = SystemFileSystemOps;
        assert!(ops.is_dir(&good));
        assert!(!ops.is_dir(&dangling));
    }

    #[test]
    fn create_dir_all_creates_ancestors() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        SystemFileSystemOps.create_dir_all(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn entry_kind_display() {
        assert_eq!(EntryKind::File.to_string(), "regular file");
        assert_eq!(EntryKind::Directory.to_string(), "directory");
    }
}
