//! mcphub CLI - package MCP server archives into container images

#![cfg_attr(test, allow(clippy::expect_used))]

use std::process::ExitCode;

use clap::Parser;
use mcphub_cli::cli::{Cli, error_code};
use mcphub_cli::output::json::format_error;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a log filter, checked before `RUST_LOG`.
const LOG_ENV: &str = "MCPHUB_LOG";

fn init_tracing(verbose: bool) {
    let default = if verbose { "mcphub_cli=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json = cli.json;

    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            match format_error(&format!("{e:#}"), error_code(&e)) {
                Ok(body) if json => println!("{body}"),
                _ => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
