use std::process::ExitCode;

use clap::Parser;
use fcm_send::cli::args::Args;
use fcm_send::cli::commands::{self, exit_code};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    let mode = args.mode().unwrap_or_else(|err| err.exit());

    match commands::run(args, mode).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(exit_code(&err))
        }
    }
}
