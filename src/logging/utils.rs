//! Log file location and timestamps.
use std::path::PathBuf;

/// `$XDG_CACHE_HOME/dotfiler`, or `~/.cache/dotfiler` when unset.
///
/// Created on first use; `None` if no base directory is known or it cannot
/// be created.
pub(super) fn cache_dir() -> Option<PathBuf> {
    let base = match non_empty_var("XDG_CACHE_HOME") {
        Some(dir) => dir,
        None => non_empty_var("HOME")
            .or_else(|| non_empty_var("USERPROFILE"))?
            .join(".cache"),
    };
    let dir = base.join("dotfiler");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

fn non_empty_var(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Log file for one run of `command`.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    Some(cache_dir()?.join(format!("{command}.log")))
}

/// Current UTC time rendered with a `chrono` format string.
pub(super) fn timestamp(format: &str) -> String {
    chrono::Utc::now().format(format).to_string()
}

/// Format for the run header.
pub(super) const HEADER_TIME: &str = "%Y-%m-%d %H:%M:%S";
/// Format for each log line.
pub(super) const LINE_TIME: &str = "%H:%M:%S";
