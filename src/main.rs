//! # Partifact CLI
//!
//! Binary entry point for the `partifact` command-line tool. Parses
//! arguments with `clap`, runs the command on a single-threaded runtime,
//! and turns errors into a message naming the error kind on stderr plus a
//! kind-specific exit code.

mod cli;

use clap::Parser;
use partifact::PartifactError;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    cli.init_logging();

    match cli.execute().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<PartifactError>() {
            Some(partifact_err) => {
                eprintln!("error [{}]: {}", partifact_err.kind(), partifact_err);
                ExitCode::from(partifact_err.exit_code())
            }
            None => {
                eprintln!("error: {}", err);
                ExitCode::FAILURE
            }
        },
    }
}
