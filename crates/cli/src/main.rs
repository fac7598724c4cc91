//! StorySeed CLI entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Parse configuration**: load `.storyseed/config.toml` (or `--config`),
//!    apply environment overrides, and validate.
//! 2. **Wire observability**: configure `tracing-subscriber` with a human or
//!    JSON layer on stderr and, when an endpoint is configured, an
//!    OpenTelemetry OTLP exporter. All `tracing` spans and events emitted by
//!    every crate in the workspace flow through this subscriber.
//! 3. **Construct infrastructure**: build the completion client, the shared
//!    storage client, and the fallback repositories, and inject them into a
//!    [`cowriter::CoWriter`].
//! 4. **Dispatch** the subcommand.

use anyhow::Context;
use clap::Parser;

mod bootstrap;
mod cli;
mod commands;
mod config;
mod identity;
mod telemetry;

use config::AppConfig;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("storyseed: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    let _telemetry = telemetry::init(&config.telemetry, cli.log_format)?;

    let mut writer = bootstrap::cowriter(&config)?;
    commands::dispatch(cli.command, &mut writer).await
}
