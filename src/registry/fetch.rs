//! Remote content fetching with a process-wide memoizing cache.

use std::collections::HashMap;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use reqwest::Client;
use tokio::sync::OnceCell;
use tracing::debug;

use super::cache::LruCache;
use super::error::RegistryError;

/// Raw bytes of a fetched resource, shared between the cache and callers.
pub type Content = Arc<[u8]>;

/// Retrieves the full body of a URL.
pub trait Fetch: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Content, RegistryError>> + Send;
}

/// Plain HTTP fetcher. No retries; non-success statuses are errors.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Content, RegistryError> {
        debug!(url = %url, "downloading");

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(RegistryError::BadStatus {
                url: url.to_string(),
                status: response.status(),
            });
        }

        let bytes = response.bytes().await?;
        debug!(url = %url, size = bytes.len(), "downloaded");
        Ok(Arc::from(bytes.as_ref()))
    }
}

/// A fetch in progress for one URL, shared by every caller that missed the
/// cache while it runs.
struct InFlight {
    cell: Arc<OnceCell<Content>>,
    waiters: usize,
}

/// Memoizes another fetcher by URL.
///
/// Completed bodies live in a bounded LRU map. Concurrent misses for the same
/// URL share a single underlying fetch; a failed fetch is never stored.
pub struct CachedFetcher<F> {
    inner: F,
    cache: Mutex<LruCache<String, Content>>,
    in_flight: Slots,
}

impl<F: Fetch> CachedFetcher<F> {
    pub fn new(inner: F, capacity: NonZeroUsize) -> Self {
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    fn lock_cache(&self) -> MutexGuard<'_, LruCache<String, Content>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cached(&self, url: &str) -> Option<Content> {
        self.lock_cache().get(&url.to_string())
    }

    fn store(&self, url: &str, content: Content) {
        let evicted = self.lock_cache().insert(url.to_string(), content);
        for key in evicted {
            debug!(url = %key, "evicted from cache");
        }
    }

    fn join_in_flight<'a>(&'a self, url: &'a str) -> InFlightGuard<'a> {
        let mut slots = lock_slots(&self.in_flight);
        let slot = slots.entry(url.to_string()).or_insert_with(|| InFlight {
            cell: Arc::default(),
            waiters: 0,
        });
        slot.waiters += 1;
        let cell = slot.cell.clone();

        InFlightGuard {
            slots: &self.in_flight,
            url,
            cell,
        }
    }
}

#[cfg(test)]
impl<F: Fetch> CachedFetcher<F> {
    pub fn is_cached(&self, url: &str) -> bool {
        self.lock_cache().contains(&url.to_string())
    }

    pub fn cached_len(&self) -> usize {
        self.lock_cache().len()
    }

    pub fn in_flight_len(&self) -> usize {
        lock_slots(&self.in_flight).len()
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }
}

type Slots = Mutex<HashMap<String, InFlight>>;

fn lock_slots(slots: &Slots) -> MutexGuard<'_, HashMap<String, InFlight>> {
    slots.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One caller's share of an in-flight slot.
///
/// The slot is removed once its fetch has succeeded or its last waiter is
/// gone, including a waiter whose future was dropped mid-fetch.
struct InFlightGuard<'a> {
    slots: &'a Slots,
    url: &'a str,
    cell: Arc<OnceCell<Content>>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut slots = lock_slots(self.slots);
        let Some(slot) = slots.get_mut(self.url) else {
            return;
        };
        // A newer slot for the same URL belongs to other callers.
        if !Arc::ptr_eq(&slot.cell, &self.cell) {
            return;
        }

        slot.waiters = slot.waiters.saturating_sub(1);
        if slot.waiters == 0 || slot.cell.initialized() {
            slots.remove(self.url);
        }
    }
}

impl<F: Fetch> Fetch for CachedFetcher<F> {
    async fn fetch(&self, url: &str) -> Result<Content, RegistryError> {
        if let Some(content) = self.cached(url) {
            debug!(url = %url, "cache hit");
            return Ok(content);
        }

        let guard = self.join_in_flight(url);
        let content = guard
            .cell
            .get_or_try_init(|| self.inner.fetch(url))
            .await?
            .clone();

        // Stored before the guard releases the slot, so late callers find
        // either the cache entry or the filled cell.
        self.store(url, content.clone());
        Ok(content)
    }
}
