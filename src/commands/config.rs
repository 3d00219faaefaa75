//! Config command - manage local configuration.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::config::BrowserConfig;

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub command: ConfigSubCmd,
}

#[derive(Subcommand)]
pub enum ConfigSubCmd {
    /// Set the simple index URL (default: https://pypi.org/simple)
    SetIndexUrl(SetIndexUrlCmd),

    /// Set how many archives are kept in memory (default: 128)
    SetCacheCapacity(SetCacheCapacityCmd),

    /// Show current configuration
    Show,
}

#[derive(Args)]
pub struct SetIndexUrlCmd {
    /// Index base URL (e.g., https://test.pypi.org/simple)
    pub url: String,
}

#[derive(Args)]
pub struct SetCacheCapacityCmd {
    /// Number of archives
    pub capacity: usize,
}

impl ConfigCmd {
    pub async fn run(&self) -> Result<()> {
        match &self.command {
            ConfigSubCmd::SetIndexUrl(cmd) => {
                let mut config = BrowserConfig::load()?;
                config.index_url = cmd.url.clone();
                config.save()?;
                println!("Index URL set to: {}", cmd.url);
            }
            ConfigSubCmd::SetCacheCapacity(cmd) => {
                let mut config = BrowserConfig::load()?;
                config.cache_capacity = cmd.capacity;
                config.save()?;
                println!("Cache capacity set to: {}", cmd.capacity);
            }
            ConfigSubCmd::Show => {
                let config = BrowserConfig::load()?;
                println!("Config: {}", BrowserConfig::config_path()?.display());
                println!();
                println!("index_url:       {}", config.index_url);
                println!("cache_capacity:  {}", config.cache_capacity);
                println!("user_agent:      {}", config.user_agent);
            }
        }
        Ok(())
    }
}
