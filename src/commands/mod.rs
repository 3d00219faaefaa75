mod config;
mod list;
mod show;

pub use config::ConfigCmd;
pub use list::ListCmd;
pub use show::ShowCmd;

use anyhow::{Result, anyhow};

use crate::browser::BrowseError;
use crate::config::BrowserConfig;

/// Load config and apply the `--index-url` override.
fn load_config(index_url: Option<&str>) -> Result<BrowserConfig> {
    let mut config = BrowserConfig::load()?;
    if let Some(url) = index_url {
        config.index_url = url.to_string();
    }
    config.validate()?;
    Ok(config)
}

/// Report a request failure with its HTTP-equivalent status.
fn status_error(e: BrowseError) -> anyhow::Error {
    anyhow!("[{}] {}", e.status_code(), e)
}
