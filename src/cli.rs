use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI entry point.
#[derive(Parser, Debug)]
#[command(
    name = "dotfiler",
    about = "Link dotfiles into place from a per-platform manifest",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage linked files
    Files(FilesOpts),
    /// Print version information
    Version,
}

/// Options for the `files` command group.
#[derive(Parser, Debug, Clone)]
pub struct FilesOpts {
    #[command(subcommand)]
    pub command: FilesCommand,
}

/// Subcommands of `files`.
#[derive(Subcommand, Debug, Clone)]
pub enum FilesCommand {
    /// Create or recreate every link the manifest declares for this platform
    Update(UpdateOpts),
}

/// Options for `files update`.
#[derive(Parser, Debug, Clone, Default)]
pub struct UpdateOpts {
    /// Manifest file, or the directory containing `dotfiler.yml`
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Root directory destinations are relative to (defaults to home)
    #[arg(short, long, visible_alias = "destinationrootdir")]
    pub destination: Option<PathBuf>,

    /// Show the plan without prompting or changing anything
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Name of the command being run, used for the log file name.
    #[must_use]
    pub fn command_name(&self) -> &'static str {
        match self.command {
            Command::Files(FilesOpts {
                command: FilesCommand::Update(_),
            }) => "update",
            Command::Version => "version",
        }
    }
}
