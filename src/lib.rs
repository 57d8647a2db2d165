//! Manifest-driven dotfile linker.
//!
//! Reads a YAML manifest (`dotfiler.yml`) of link entries, keeps the ones
//! whose target operating systems and architectures match the running host,
//! previews what would change, asks once for confirmation, and then replaces
//! each destination with a symbolic link to its source.
//!
//! - **[`manifest`]**: locate, parse and validate the manifest
//! - **[`reconcile`]**: plan, confirm and apply passes
//! - **[`operations`]** and **[`deps`]**: filesystem and host seams
//! - **[`commands`]**: subcommand orchestration and error reporting
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod deps;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod operations;
pub mod platform;
pub mod reconcile;
