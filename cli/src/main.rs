//! Skiff CLI - run a containerized analysis on a short-lived cloud instance

use std::process::ExitCode;

use clap::Parser;
use skiff_cli::cli::Cli;
use skiff_cli::output::json;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    skiff_cli::app::init_tracing();
    let json = cli.json;
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            let message = format!("{e:#}");
            match json::format_error(&message, "command_failed") {
                Ok(obj) if json => println!("{obj}"),
                _ => eprintln!("Error: {message}"),
            }
            ExitCode::FAILURE
        }
    }
}
