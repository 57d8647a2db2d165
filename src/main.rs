use std::process::ExitCode;

use clap::Parser;

use dotfiler::cli::{self, Command, FilesCommand};
use dotfiler::commands::{self, Failure};
use dotfiler::deps::SystemDependencies;
use dotfiler::logging::{self, Logger};
use dotfiler::operations::SystemFileSystemOps;

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    logging::init_subscriber(args.verbose, args.command_name());
    let log = Logger::new(args.command_name());

    let result = match &args.command {
        Command::Files(files) => match &files.command {
            FilesCommand::Update(opts) => std::env::current_dir()
                .map_err(anyhow::Error::from)
                .and_then(|cwd| {
                    commands::update::run(
                        opts,
                        &SystemDependencies,
                        &SystemFileSystemOps,
                        &log,
                        &cwd,
                    )
                }),
        },
        Command::Version => {
            commands::version::run();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if commands::report_failure(&err, &log) == Failure::Unexpected
                && let Some(path) = log.log_path()
            {
                log.info(&format!("details in {}", path.display()));
            }
            ExitCode::FAILURE
        }
    }
}
