//! Command: `files update`, reconcile the destination tree with the manifest.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use crate::cli::UpdateOpts;
use crate::deps::{Dependencies, platform_of};
use crate::error::DotfilerError;
use crate::logging::Log;
use crate::manifest::{self, validation};
use crate::operations::FileSystemOps;
use crate::reconcile::{self, Context};

/// Run the update command.
///
/// Loads the manifest, previews every applicable link, asks once for
/// confirmation and then applies.  With `--dry-run` it stops after the
/// preview.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded, a destination
/// conflicts, the user declines, or a link cannot be applied.
pub fn run(
    opts: &UpdateOpts,
    deps: &dyn Dependencies,
    fs: &dyn FileSystemOps,
    log: &dyn Log,
    cwd: &Path,
) -> Result<()> {
    let platform = platform_of(deps);
    log.info(&format!("Current OS: {}", platform.os));
    log.info(&format!("Current Arch: {}", platform.arch));

    log.stage("Loading manifest");
    let manifest_path = manifest::resolve_path(opts.manifest.as_deref(), cwd, log);
    log.info(&format!("manifest: {}", manifest_path.display()));
    let manifest = manifest::load(&manifest_path)?;
    log.debug(&format!("{} entries", manifest.len()));

    for warning in validation::validate(&manifest, &platform) {
        log.warn(&format!(
            "entry {} [{}]: {}",
            warning.entry, warning.field, warning.message
        ));
    }

    let destination_root = resolve_destination(opts.destination.as_deref(), deps, cwd)?;
    log.info(&format!("destination: {}", destination_root.display()));

    let ctx = Context::new(&manifest, &platform, &destination_root, log, fs);

    log.stage("Planning links");
    let plan = reconcile::preview(&ctx)?;
    if plan.is_empty() {
        log.info(&format!("nothing to do for {platform}"));
        return Ok(());
    }
    if opts.dry_run {
        log.info(&format!("{} link(s) would be applied", plan.links.len()));
        return Ok(());
    }

    reconcile::confirm(deps, log).context("reading confirmation")?;

    log.stage("Applying links");
    let summary = reconcile::apply(&ctx).context("applying links")?;
    log.info(&format!(
        "{} link(s) applied ({} created, {} replaced)",
        summary.total(),
        summary.created,
        summary.replaced
    ));
    Ok(())
}

/// Destination root: the explicit option resolved against `cwd`, else the
/// user's home directory.
///
/// # Errors
///
/// Returns [`DotfilerError::HomeDirectoryUnavailable`] if no destination was
/// given and the home directory is unknown or empty.
pub fn resolve_destination(
    explicit: Option<&Path>,
    deps: &dyn Dependencies,
    cwd: &Path,
) -> Result<PathBuf, DotfilerError> {
    if let Some(path) = explicit {
        return Ok(cwd.join(path));
    }
    let home = deps.home_dir()?;
    if home.as_os_str().is_empty() {
        return Err(DotfilerError::HomeDirectoryUnavailable {
            reason: "home directory is empty".to_string(),
        });
    }
    Ok(home)
}
