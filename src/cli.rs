//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::{ConfigCmd, ListCmd, ShowCmd};

#[derive(Parser)]
#[command(name = "wfb")]
#[command(about = "Browse package index releases and peek inside wheels and sdists")]
#[command(version)]
pub struct Cli {
    /// Simple index to browse (overrides the configured index)
    #[arg(long, global = true, env = "WFB_INDEX_URL")]
    pub index_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the published files of a project, latest first
    List(ListCmd),

    /// Print a metadata file from inside a published file
    Show(ShowCmd),

    /// Manage configuration
    Config(ConfigCmd),
}

impl Cli {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let index_url = self.index_url.as_deref();
        match &self.command {
            Command::List(cmd) => cmd.run(index_url).await,
            Command::Show(cmd) => cmd.run(index_url).await,
            Command::Config(cmd) => cmd.run().await,
        }
    }
}
