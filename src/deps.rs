//! Host capabilities the reconciliation engine consumes.
//!
//! The engine never calls platform APIs directly; it asks a
//! [`Dependencies`] implementation.  Production code passes
//! [`SystemDependencies`]; tests pass a mock or a fixed fake.

use std::io::{BufRead as _, Write as _};
use std::path::PathBuf;

use crate::error::DotfilerError;
use crate::platform::Platform;

/// Platform identification, home directory lookup, and confirmation input.
#[cfg_attr(test, mockall::automock)]
pub trait Dependencies {
    /// Current operating system identifier (e.g. `linux`, `darwin`).
    fn os(&self) -> String;

    /// Current CPU architecture identifier (e.g. `amd64`, `arm64`).
    fn arch(&self) -> String;

    /// The user's home directory, the default destination root.
    ///
    /// # Errors
    ///
    /// Returns [`DotfilerError::HomeDirectoryUnavailable`] if it cannot be
    /// determined.
    fn home_dir(&self) -> Result<PathBuf, DotfilerError>;

    /// Block until the user answers the confirmation prompt and return the
    /// key they pressed.
    ///
    /// # Errors
    ///
    /// Returns [`DotfilerError::Input`] if input cannot be read.
    fn read_confirmation_key(&self) -> Result<char, DotfilerError>;
}

/// Convenience accessor for the `(os, arch)` pair a [`Dependencies`] reports.
pub fn platform_of(deps: &dyn Dependencies) -> Platform {
    Platform::new(deps.os(), deps.arch())
}

/// Production [`Dependencies`] backed by the running process.
#[derive(Debug, Default)]
pub struct SystemDependencies;

impl Dependencies for SystemDependencies {
    fn os(&self) -> String {
        Platform::detect().os
    }

    fn arch(&self) -> String {
        Platform::detect().arch
    }

    fn home_dir(&self) -> Result<PathBuf, DotfilerError> {
        let var = if cfg!(target_os = "windows") {
            std::env::var("USERPROFILE").or_else(|_| std::env::var("HOME"))
        } else {
            std::env::var("HOME")
        };
        match var {
            Ok(home) if !home.is_empty() => Ok(PathBuf::from(home)),
            Ok(_) => Err(DotfilerError::HomeDirectoryUnavailable {
                reason: "home directory environment variable is empty".to_string(),
            }),
            Err(e) => Err(DotfilerError::HomeDirectoryUnavailable {
                reason: e.to_string(),
            }),
        }
    }

    fn read_confirmation_key(&self) -> Result<char, DotfilerError> {
        std::io::stdout().flush().map_err(DotfilerError::Input)?;
        let mut line = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(DotfilerError::Input)?;
        Ok(first_key(&line))
    }
}

/// The first non-whitespace character of a line of input, or `'\n'` when
/// the line is blank.
fn first_key(line: &str) -> char {
    line.chars().find(|c| !c.is_whitespace()).unwrap_or('\n')
}
