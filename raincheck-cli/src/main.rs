//! Binary crate for the `raincheck` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration and the interactive search prompt
//! - Rendering search state for humans (or as JSON)

use std::process::ExitCode;

use clap::Parser;

mod cli;
mod view;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cmd = cli::Cli::parse();
    cmd.init_logging();
    cmd.run().await
}
