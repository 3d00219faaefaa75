//! In-memory fetcher for tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::error::RegistryError;
use super::fetch::{Content, Fetch};

/// Serves canned bodies by URL and counts every call.
#[derive(Default)]
pub struct FakeFetcher {
    bodies: HashMap<String, Content>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, body: &[u8]) -> Self {
        self.bodies.insert(url.to_string(), Arc::from(body));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Fetch for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<Content, RegistryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| RegistryError::BadStatus {
                url: url.to_string(),
                status: reqwest::StatusCode::NOT_FOUND,
            })
    }
}
