//! wfb - browse package index releases and peek inside wheels and sdists.

mod archive;
mod browser;
mod cli;
mod commands;
mod config;
mod registry;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries file contents for `show`, so logs go to stderr
    // (controlled by RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    cli.execute().await
}
