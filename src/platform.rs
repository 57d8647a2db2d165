use std::fmt;

/// The operating system and CPU architecture a run is evaluated against.
///
/// Identifiers use the vocabulary manifests are written in (`linux`,
/// `darwin`, `windows`; `amd64`, `arm64`, `386`), not Rust's target names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// Operating system identifier.
    pub os: String,
    /// CPU architecture identifier.
    pub arch: String,
}

impl Platform {
    /// Create a platform with explicit identifiers.
    #[must_use]
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Detect the platform this binary was built for.
    #[must_use]
    pub fn detect() -> Self {
        Self::new(
            os_identifier(std::env::consts::OS),
            arch_identifier(std::env::consts::ARCH),
        )
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

/// Map a Rust `target_os` value to its manifest identifier.
#[must_use]
pub fn os_identifier(rust_os: &str) -> &str {
    match rust_os {
        "macos" => "darwin",
        other => other,
    }
}

/// Map a Rust `target_arch` value to its manifest identifier.
#[must_use]
pub fn arch_identifier(rust_arch: &str) -> &str {
    match rust_arch {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "386",
        "powerpc64" => "ppc64",
        "loongarch64" => "loong64",
        other => other,
    }
}
