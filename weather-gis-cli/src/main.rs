//! Binary crate for the `weather-gis` command-line dashboard.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration and province picking
//! - Human-friendly output formatting and SVG chart export

use clap::Parser;

mod cli;
mod render;
mod svg;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cli::init_logging(cmd.verbose);
    cmd.run().await
}
