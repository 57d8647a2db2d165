use std::collections::HashMap;
use std::path::Path;

use super::Manifest;
use crate::platform::Platform;

/// A non-fatal problem detected in a loaded manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// 1-based position of the offending entry.
    pub entry: usize,
    /// Manifest field the warning is about (e.g. `targetOS`).
    pub field: &'static str,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    #[must_use]
    fn new(entry: usize, field: &'static str, message: impl Into<String>) -> Self {
        Self {
            entry,
            field,
            message: message.into(),
        }
    }
}

/// Check a manifest for entries that are legal but probably not intended.
///
/// - an empty `targetOS` or `targetArch` means the entry never applies
/// - an absolute path escapes the root it is supposed to be relative to
/// - two applicable entries with the same destination: the later one wins
#[must_use]
pub fn validate(manifest: &Manifest, platform: &Platform) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for (i, entry) in manifest.entries.iter().enumerate() {
        let n = i + 1;
        if entry.target_platforms.is_empty() {
            warnings.push(ValidationWarning::new(
                n,
                "targetOS",
                "no operating systems listed; entry never applies",
            ));
        }
        if entry.target_architectures.is_empty() {
            warnings.push(ValidationWarning::new(
                n,
                "targetArch",
                "no architectures listed; entry never applies",
            ));
        }
        check_relative(&mut warnings, n, "srcFilePath", &entry.source_path);
        check_relative(&mut warnings, n, "dstFilePath", &entry.destination_path);
    }

    let mut first_seen: HashMap<&Path, usize> = HashMap::new();
    for (i, entry) in manifest.applicable(platform) {
        let n = i + 1;
        if let Some(&earlier) = first_seen.get(entry.destination_path.as_path()) {
            warnings.push(ValidationWarning::new(
                n,
                "dstFilePath",
                format!(
                    "destination {} is also declared by entry {earlier}; this entry overrides it",
                    entry.destination_path.display()
                ),
            ));
        } else {
            first_seen.insert(entry.destination_path.as_path(), n);
        }
    }

    warnings
}

fn check_relative(warnings: &mut Vec<ValidationWarning>, entry: usize, field: &'static str, path: &Path) {
    if path.is_absolute() {
        warnings.push(ValidationWarning::new(
            entry,
            field,
            format!("{} is absolute and ignores its root directory", path.display()),
        ));
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::manifest::test_helpers::{entry, manifest};

    fn linux() -> Platform {
        Platform::new("linux", "amd64")
    }

    #[test]
    fn clean_manifest_has_no_warnings() {
        let m = manifest(
            Path::new("/repo"),
            vec![
                entry("a", "A", &["linux"], &["amd64"]),
                entry("b", "B", &["linux"], &["amd64"]),
            ],
        );
        assert!(validate(&m, &linux()).is_empty());
    }

    #[test]
    fn warns_on_empty_target_sets() {
        let m = manifest(Path::new("/repo"), vec![entry("a", "A", &[], &[])]);
        let warnings = validate(&m, &linux());
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].field, "targetOS");
        assert_eq!(warnings[1].field, "targetArch");
    }

    #[cfg(unix)]
    #[test]
    fn warns_on_absolute_paths() {
        let m = manifest(
            Path::new("/repo"),
            vec![entry("/etc/passwd", "A", &["linux"], &["amd64"])],
        );
        let warnings = validate(&m, &linux());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "srcFilePath");
    }

    #[test]
    fn warns_on_duplicate_applicable_destination() {
        let m = manifest(
            Path::new("/repo"),
            vec![
                entry("a", "A.txt", &["linux"], &["amd64"]),
                entry("b", "A.txt", &["linux"], &["amd64"]),
            ],
        );
        let warnings = validate(&m, &linux());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].entry, 2);
        assert!(warnings[0].message.contains("entry 1"));
    }

    #[test]
    fn duplicates_on_other_platforms_are_ignored() {
        let m = manifest(
            Path::new("/repo"),
            vec![
                entry("a", "A.txt", &["linux"], &["amd64"]),
                entry("b", "A.txt", &["darwin"], &["arm64"]),
            ],
        );
        assert!(validate(&m, &linux()).is_empty());
    }
}
