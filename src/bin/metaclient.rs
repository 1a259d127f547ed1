//! Metaclient CLI Binary
//!
//! Command-line interface for grouping sources and reducing pin trees.

use anyhow::Context;
use clap::Parser;
use metaclient::logging::init_logging;
use metaclient::tooling::cli::{Cli, CliContext};
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<String> {
    let working_dir = std::env::current_dir().context("Failed to resolve working directory")?;
    let context = CliContext::new(working_dir, cli.config.clone())
        .context("Failed to load configuration")?;

    let logging = cli.logging_config(&context.config().logging);
    init_logging(Some(&logging)).context("Failed to initialize logging")?;

    let cancel = context.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, returning partial results");
            cancel.cancel();
        }
    });

    Ok(context.execute(&cli.command).await?)
}
