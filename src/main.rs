//! git-flow: high-level repository operations for the feature / release /
//! hotfix / support branching model.
//!
//! This is the main entry point for the `git-flow` CLI (invoked as
//! `git flow`). It parses arguments, dispatches to the appropriate command
//! handler, and handles errors with proper exit codes.

mod cli;
mod commands;
pub mod compare;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod flow;
pub mod fs;
pub mod git;
pub mod guards;
pub mod repo;
pub mod resolve;
pub mod resume;

#[cfg(test)]
mod test_support;

use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    let verbosity = cli.verbosity();

    match commands::dispatch(cli.command, verbosity) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
