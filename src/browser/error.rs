//! Request-level errors.

use thiserror::Error;

use crate::registry::RegistryError;

#[derive(Debug, Error)]
pub enum BrowseError {
    #[error("dist file not found: {project}/{dist}")]
    DistNotFound { project: String, dist: String },

    #[error("dist content not found: {name} in {dist}")]
    MemberNotFound { dist: String, name: String },

    #[error("index query failed: {0}")]
    IndexQueryFailed(#[source] RegistryError),

    #[error("download failed: {0}")]
    Transport(#[source] RegistryError),

    #[error("archive read error: {0}")]
    ArchiveRead(String),
}

impl BrowseError {
    /// HTTP-equivalent status for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            BrowseError::DistNotFound { .. } | BrowseError::MemberNotFound { .. } => 404,
            BrowseError::IndexQueryFailed(_) => 400,
            BrowseError::Transport(_) | BrowseError::ArchiveRead(_) => 500,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == 404
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let dist = BrowseError::DistNotFound {
            project: "demo".into(),
            dist: "demo-1.0.zip".into(),
        };
        let member = BrowseError::MemberNotFound {
            dist: "demo-1.0.zip".into(),
            name: "setup.py".into(),
        };
        let index = BrowseError::IndexQueryFailed(RegistryError::IndexQueryFailed {
            project: "demo".into(),
            status: reqwest::StatusCode::NOT_FOUND,
        });

        assert_eq!(dist.status_code(), 404);
        assert_eq!(member.status_code(), 404);
        assert_eq!(index.status_code(), 400);
        assert_eq!(BrowseError::ArchiveRead("bad".into()).status_code(), 500);
        assert!(dist.is_not_found());
        assert!(!index.is_not_found());
    }

    #[test]
    fn test_messages_distinguish_dist_and_member() {
        let dist = BrowseError::DistNotFound {
            project: "demo".into(),
            dist: "demo-1.0.zip".into(),
        };
        let member = BrowseError::MemberNotFound {
            dist: "demo-1.0.zip".into(),
            name: "setup.py".into(),
        };

        assert!(dist.to_string().starts_with("dist file not found"));
        assert!(member.to_string().starts_with("dist content not found"));
    }
}
