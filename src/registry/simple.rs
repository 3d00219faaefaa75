//! Simple repository API client (PEP 503 listing pages).
//!
//! A project page is an HTML document with one anchor per artifact:
//!
//! ```text
//! <a href="https://files.example/demo-1.0.tar.gz#sha256=abc" data-requires-python="&gt;=3.8">demo-1.0.tar.gz</a><br/>
//! ```

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::Serialize;
use tracing::debug;
use url::Url;

use super::error::RegistryError;
use super::fetch::{Fetch, HttpFetcher};

/// Default index: PyPI's simple API.
pub const PYPI_SIMPLE: &str = "https://pypi.org/simple";

/// Digest carried in an artifact URL fragment (`#sha256=...`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactHash {
    pub algorithm: String,
    pub value: String,
}

/// One downloadable artifact of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactLink {
    pub filename: String,
    /// Absolute download URL, without the hash fragment.
    pub url: String,
    pub hash: Option<ArtifactHash>,
    pub requires_python: Option<String>,
    /// `Some("")` when yanked without a reason.
    pub yanked: Option<String>,
}

impl ArtifactLink {
    pub fn new(filename: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            url: url.into(),
            hash: None,
            requires_python: None,
            yanked: None,
        }
    }
}

/// Lists the artifacts of a project from a simple index.
///
/// Listing pages are fetched uncached; they change whenever a release is
/// published.
pub struct SimpleClient<F = HttpFetcher> {
    fetcher: F,
    index_url: String,
}

impl<F: Fetch> SimpleClient<F> {
    pub fn new(fetcher: F, index_url: &str) -> Self {
        Self {
            fetcher,
            index_url: index_url.trim_end_matches('/').to_string(),
        }
    }

    /// Listing page URL for `project` (always with a trailing slash).
    ///
    /// The project is a single percent-encoded path segment, so `?`, `#` and
    /// `/` cannot reach the query, fragment or parent path.
    pub fn project_url(&self, project: &str) -> Result<Url, RegistryError> {
        if matches!(project, "" | "." | "..") {
            return Err(RegistryError::InvalidProject(project.to_string()));
        }

        let mut url = Url::parse(&self.index_url)?;
        url.path_segments_mut()
            .map_err(|_| RegistryError::IndexNotABase(self.index_url.clone()))?
            .pop_if_empty()
            .push(project)
            .push("");
        Ok(url)
    }

    /// Fetch and parse the listing for `project`, in page order.
    pub async fn list_links(&self, project: &str) -> Result<Vec<ArtifactLink>, RegistryError> {
        let url = self.project_url(project)?;
        debug!(project = project, url = %url, "fetching simple listing");

        let body = self
            .fetcher
            .fetch(url.as_str())
            .await
            .map_err(|e| match e {
                RegistryError::BadStatus { status, .. } => RegistryError::IndexQueryFailed {
                    project: project.to_string(),
                    status,
                },
                other => other,
            })?;

        let links = parse_links(&String::from_utf8_lossy(&body), &url);
        debug!(project = project, count = links.len(), "parsed simple listing");
        Ok(links)
    }
}

/// Parse every `<a href>` anchor of a listing page.
///
/// HTML is parsed leniently: unclosed and mismatched tags are tolerated, and
/// a hard parse error ends the scan with whatever was collected so far.
pub fn parse_links(html: &str, base: &Url) -> Vec<ArtifactLink> {
    let mut reader = Reader::from_str(html);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut links = Vec::new();
    let mut current: Option<(PendingAnchor, String)> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if is_anchor(&e) => {
                current = PendingAnchor::from_tag(&e).map(|anchor| (anchor, String::new()));
            }
            Ok(Event::Text(e)) => {
                if let Some((_, text)) = current.as_mut() {
                    match e.unescape() {
                        Ok(unescaped) => text.push_str(&unescaped),
                        Err(_) => text.push_str(&String::from_utf8_lossy(&e)),
                    }
                }
            }
            Ok(Event::End(e)) if e.local_name().as_ref().eq_ignore_ascii_case(b"a") => {
                if let Some((anchor, text)) = current.take()
                    && let Some(link) = anchor.resolve(text.trim(), base)
                {
                    links.push(link);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                debug!(error = %e, "stopped parsing listing");
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    links
}

fn is_anchor(tag: &BytesStart) -> bool {
    tag.local_name().as_ref().eq_ignore_ascii_case(b"a")
}

/// Attributes of an `<a>` whose text has not been read yet.
struct PendingAnchor {
    href: String,
    requires_python: Option<String>,
    yanked: Option<String>,
}

impl PendingAnchor {
    fn from_tag(tag: &BytesStart) -> Option<Self> {
        let mut href = None;
        let mut requires_python = None;
        let mut yanked = None;

        for attr in tag.html_attributes().flatten() {
            let value = attr
                .unescape_value()
                .unwrap_or_else(|_| Cow::Owned(String::from_utf8_lossy(&attr.value).into_owned()))
                .into_owned();

            match attr.key.as_ref().to_ascii_lowercase().as_slice() {
                b"href" => href = Some(value),
                b"data-requires-python" => requires_python = Some(value),
                b"data-yanked" => yanked = Some(value),
                _ => {}
            }
        }

        Some(Self {
            href: href?,
            requires_python,
            yanked,
        })
    }

    fn resolve(self, filename: &str, base: &Url) -> Option<ArtifactLink> {
        if filename.is_empty() {
            return None;
        }

        let mut url = base.join(&self.href).ok()?;
        let hash = url
            .fragment()
            .and_then(|fragment| fragment.split_once('='))
            .map(|(algorithm, value)| ArtifactHash {
                algorithm: algorithm.to_string(),
                value: value.to_string(),
            });
        url.set_fragment(None);

        Some(ArtifactLink {
            filename: filename.to_string(),
            url: url.to_string(),
            hash,
            requires_python: self.requires_python.filter(|s| !s.is_empty()),
            yanked: self.yanked,
        })
    }
}
