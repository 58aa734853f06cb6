#![doc = include_str!("../README.md")]

mod cli;
mod report;
mod telemetry;

use clap::Parser;
use cli::{CliArgs, Settings};
use fanout::CommandInvoker;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let settings = Settings::try_from(args)?;

    telemetry::init();
    tracing::debug!("Validated settings: {:#?}", settings);

    let batches = fanout::plan(
        settings.run.total,
        settings.run.batch_size,
        settings.run.start_offset,
    );
    report::print_banner(&settings.run, batches.len());

    let invoker = Arc::new(CommandInvoker::new(settings.command));
    let summary = fanout::run(&settings.run, batches, invoker).await?;

    // Per-batch failures are already in the summary; they never fail the
    // process.
    report::print_summary(&summary);
    Ok(())
}
