//! Request flows: list a project's artifacts, read one member of one artifact.
//!
//! A [`Browser`] owns the listing client and the memoizing archive fetcher,
//! so every read made through it shares one content cache.

mod error;

pub use error::BrowseError;

use std::num::NonZeroUsize;

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use tracing::info;

use crate::archive::{ArchiveError, Entry};
use crate::config::BrowserConfig;
use crate::registry::{CachedFetcher, Fetch, HttpFetcher, SimpleClient};

pub struct Browser<F = HttpFetcher> {
    listing: SimpleClient<F>,
    archives: CachedFetcher<F>,
}

impl Browser<HttpFetcher> {
    /// Build an HTTP-backed browser from configuration.
    pub fn from_config(config: &BrowserConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::with_fetchers(
            HttpFetcher::new(client.clone()),
            HttpFetcher::new(client),
            &config.index_url,
            config.capacity()?,
        ))
    }
}

impl<F: Fetch> Browser<F> {
    /// `listing` fetches index pages uncached, `archives` is wrapped in the
    /// content cache.
    pub fn with_fetchers(
        listing: F,
        archives: F,
        index_url: &str,
        capacity: NonZeroUsize,
    ) -> Self {
        Self {
            listing: SimpleClient::new(listing, index_url),
            archives: CachedFetcher::new(archives, capacity),
        }
    }

    /// Entries of `project`, latest first (the index lists oldest first).
    pub async fn entries(&self, project: &str) -> Result<Vec<Entry>, BrowseError> {
        let links = self
            .listing
            .list_links(project)
            .await
            .map_err(BrowseError::IndexQueryFailed)?;

        Ok(links
            .into_iter()
            .rev()
            .map(|link| Entry::new(project, link))
            .collect())
    }

    pub async fn find_entry(&self, project: &str, dist: &str) -> Result<Entry, BrowseError> {
        self.entries(project)
            .await?
            .into_iter()
            .find(|entry| entry.filename() == dist)
            .ok_or_else(|| BrowseError::DistNotFound {
                project: project.to_string(),
                dist: dist.to_string(),
            })
    }

    /// Read `arcname` from the artifact `dist` of `project`.
    pub async fn read(
        &self,
        project: &str,
        dist: &str,
        arcname: &str,
    ) -> Result<Vec<u8>, BrowseError> {
        info!(project, dist, arcname, "reading dist content");
        let entry = self.find_entry(project, dist).await?;
        self.read_entry(&entry, arcname).await
    }

    /// Read several members of one entry concurrently, results in the order
    /// of `arcnames`. The reads share one download of the archive.
    pub async fn read_members(
        &self,
        entry: &Entry,
        arcnames: &[&str],
    ) -> Vec<Result<Vec<u8>, BrowseError>> {
        info!(dist = %entry.filename(), count = arcnames.len(), "reading dist contents");
        stream::iter(arcnames)
            .map(|arcname| self.read_entry(entry, arcname))
            .buffered(arcnames.len().max(1))
            .collect()
            .await
    }

    pub async fn read_entry(&self, entry: &Entry, arcname: &str) -> Result<Vec<u8>, BrowseError> {
        entry
            .read_file(&self.archives, arcname)
            .await
            .map_err(|e| match e {
                ArchiveError::NotFound(_) => BrowseError::MemberNotFound {
                    dist: entry.filename().to_string(),
                    name: arcname.to_string(),
                },
                ArchiveError::Fetch(e) => BrowseError::Transport(e),
                other => BrowseError::ArchiveRead(other.to_string()),
            })
    }
}

#[cfg(test)]
impl<F: Fetch> Browser<F> {
    pub fn archives(&self) -> &CachedFetcher<F> {
        &self.archives
    }
}
