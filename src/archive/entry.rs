//! A published artifact bound to its archive kind.

use serde::Serialize;
use tracing::debug;

use crate::registry::{ArtifactLink, Fetch};

use super::error::ArchiveError;
use super::{ArchiveKind, sdist, wheel};

/// Path under which a member of a dist is served: `/{project}/{dist}/{arcname}`.
pub fn content_path(project: &str, dist: &str, arcname: &str) -> String {
    format!("/{}/{}/{}", project, dist, arcname)
}

/// One artifact of a project listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub project: String,
    pub link: ArtifactLink,
    pub kind: ArchiveKind,
}

impl Entry {
    pub fn new(project: impl Into<String>, link: ArtifactLink) -> Self {
        let kind = ArchiveKind::classify(&link.filename);
        Self {
            project: project.into(),
            link,
            kind,
        }
    }

    pub fn filename(&self) -> &str {
        &self.link.filename
    }

    pub fn stem(&self) -> &str {
        self.kind.stem(&self.link.filename)
    }

    pub fn useful_filenames(&self) -> &'static [&'static str] {
        self.kind.useful_filenames()
    }

    pub fn is_useful(&self, name: &str) -> bool {
        self.useful_filenames().contains(&name)
    }

    pub fn url_for_content(&self, arcname: &str) -> String {
        content_path(&self.project, self.filename(), arcname)
    }

    /// Read one allow-listed member, downloading the archive through `fetcher`.
    ///
    /// Names outside the allow-list fail before any download.
    pub async fn read_file<F: Fetch>(
        &self,
        fetcher: &F,
        name: &str,
    ) -> Result<Vec<u8>, ArchiveError> {
        if !self.is_useful(name) {
            return Err(ArchiveError::NotFound(name.to_string()));
        }

        debug!(dist = %self.filename(), member = name, kind = %self.kind, "reading member");
        let content = fetcher.fetch(&self.link.url).await?;

        match self.kind {
            ArchiveKind::Wheel => wheel::read_member(&content, self.filename(), name),
            ArchiveKind::GzipTarSdist => {
                let stem = self.stem().to_string();
                let name = name.to_string();
                tokio::task::spawn_blocking(move || sdist::read_tgz_member(&content, &stem, &name))
                    .await
                    .map_err(|e| ArchiveError::Read(e.to_string()))?
            }
            ArchiveKind::ZipSdist => sdist::read_zip_sdist_member(&content, name),
            ArchiveKind::Unsupported => Err(ArchiveError::NotFound(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::fixtures::{tgz_archive, zip_archive};
    use crate::registry::testing::FakeFetcher;

    fn entry(filename: &str) -> Entry {
        Entry::new(
            "demo",
            ArtifactLink::new(filename, format!("https://files.example/{}", filename)),
        )
    }

    #[test]
    fn test_new_classifies() {
        assert_eq!(entry("demo-1.0-py3-none-any.whl").kind, ArchiveKind::Wheel);
        assert_eq!(entry("demo-1.0.tar.gz").kind, ArchiveKind::GzipTarSdist);
        assert_eq!(entry("demo-1.0.zip").kind, ArchiveKind::ZipSdist);
        assert_eq!(entry("demo-1.0.exe").kind, ArchiveKind::Unsupported);
    }

    #[test]
    fn test_stem() {
        assert_eq!(entry("demo-1.0.tar.gz").stem(), "demo-1.0");
        assert_eq!(entry("demo-1.0.zip").stem(), "demo-1.0");
    }

    #[test]
    fn test_url_for_content() {
        assert_eq!(
            entry("demo-1.0.tar.gz").url_for_content("setup.py"),
            "/demo/demo-1.0.tar.gz/setup.py"
        );
    }

    #[tokio::test]
    async fn test_wheel_rejects_without_fetch() {
        let fetcher = FakeFetcher::new();
        let wheel = entry("demo-1.0-py3-none-any.whl");

        for name in ["setup.py", "RECORD", "WHEEL", ""] {
            let err = wheel.read_file(&fetcher, name).await.unwrap_err();
            assert!(matches!(err, ArchiveError::NotFound(_)));
        }
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_never_fetches() {
        let fetcher = FakeFetcher::new();
        let exe = entry("demo-1.0.exe");

        let err = exe.read_file(&fetcher, "setup.py").await.unwrap_err();
        assert!(matches!(err, ArchiveError::NotFound(_)));
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_sdist_rejects_unlisted_name_without_fetch() {
        let fetcher = FakeFetcher::new();

        let err = entry("demo-1.0.tar.gz")
            .read_file(&fetcher, "PKG-INFO")
            .await
            .unwrap_err();
        assert!(matches!(err, ArchiveError::NotFound(_)));
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_read_wheel_metadata() {
        let wheel = zip_archive(&[("demo-1.0.dist-info/METADATA", "Name: demo\n")]);
        let fetcher = FakeFetcher::new()
            .with("https://files.example/demo-1.0-py3-none-any.whl", &wheel);

        let content = entry("demo-1.0-py3-none-any.whl")
            .read_file(&fetcher, "METADATA")
            .await
            .unwrap();
        assert_eq!(content, b"Name: demo\n");
    }

    #[tokio::test]
    async fn test_read_tgz_member() {
        let tgz = tgz_archive(&[("demo-1.0/setup.cfg", "[metadata]\nname = demo\n")]);
        let fetcher = FakeFetcher::new().with("https://files.example/demo-1.0.tar.gz", &tgz);

        let content = entry("demo-1.0.tar.gz")
            .read_file(&fetcher, "setup.cfg")
            .await
            .unwrap();
        assert_eq!(content, b"[metadata]\nname = demo\n");
    }

    #[tokio::test]
    async fn test_read_zip_sdist_member() {
        let zip = zip_archive(&[
            ("pyproject.toml", "[project]\nname = \"demo\"\n"),
            ("demo-1.0/setup.py", "setup()"),
        ]);
        let fetcher = FakeFetcher::new().with("https://files.example/demo-1.0.zip", &zip);
        let sdist = entry("demo-1.0.zip");

        assert_eq!(
            sdist.read_file(&fetcher, "pyproject.toml").await.unwrap(),
            b"[project]\nname = \"demo\"\n"
        );
        let err = sdist.read_file(&fetcher, "setup.py").await.unwrap_err();
        assert!(matches!(err, ArchiveError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let fetcher = FakeFetcher::new();

        let err = entry("demo-1.0.zip")
            .read_file(&fetcher, "setup.py")
            .await
            .unwrap_err();
        assert!(matches!(err, ArchiveError::Fetch(_)));
    }
}
