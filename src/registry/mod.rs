//! Package index access: the simple listing client and the memoizing
//! content fetcher shared by every archive read.
//!
//! # Example
//!
//! ```ignore
//! use crate::registry::{CachedFetcher, HttpFetcher, SimpleClient, PYPI_SIMPLE};
//!
//! let listing = SimpleClient::new(HttpFetcher::default(), PYPI_SIMPLE);
//! let links = listing.list_links("requests").await?;
//! ```

mod cache;
mod error;
mod fetch;
mod simple;

#[cfg(test)]
pub mod testing;

pub use cache::DEFAULT_CAPACITY;
pub use error::RegistryError;
pub use fetch::{CachedFetcher, Fetch, HttpFetcher};
pub use simple::{ArtifactLink, PYPI_SIMPLE, SimpleClient};
