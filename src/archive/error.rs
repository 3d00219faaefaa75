//! Archive introspection errors.

use thiserror::Error;

use crate::registry::RegistryError;

#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Member absent, or outside the allow-list for the archive kind.
    #[error("{0} not found in archive")]
    NotFound(String),

    #[error("archive read error: {0}")]
    Read(String),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("download failed: {0}")]
    Fetch(#[from] RegistryError),
}
