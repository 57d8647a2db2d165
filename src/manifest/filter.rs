//! Platform applicability of manifest entries.
use super::LinkEntry;
use crate::platform::Platform;

/// Whether `entry` applies to `platform`.
///
/// Both the OS and the architecture must be listed; an empty set matches
/// nothing.
#[must_use]
pub fn applies(entry: &LinkEntry, platform: &Platform) -> bool {
    entry.target_platforms.contains(&platform.os)
        && entry.target_architectures.contains(&platform.arch)
}
