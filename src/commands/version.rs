//! Command: print version information.

/// Build version: `DOTFILER_VERSION` from `build.rs`, else the crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("DOTFILER_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the dotfiler version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("dotfiler {}", version());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
