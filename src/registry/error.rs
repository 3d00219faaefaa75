//! Registry client errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("index query for {project} failed with status {status}")]
    IndexQueryFailed {
        project: String,
        status: reqwest::StatusCode,
    },

    #[error("fetching {url} failed with status {status}")]
    BadStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("invalid project name: {0:?}")]
    InvalidProject(String),

    #[error("index URL cannot hold a project path: {0}")]
    IndexNotABase(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
