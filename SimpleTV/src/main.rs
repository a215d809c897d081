use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

mod cli;
mod logs;
mod output;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    cli::Args::parse().run().await
}
