//! Archive introspection for wheels and sdists.
//!
//! An artifact's kind is decided from its filename alone. Each kind has a
//! small allow-list of members worth showing and its own rule for where that
//! member lives inside the archive.

mod entry;
mod error;
mod sdist;
mod wheel;

use std::io::{Cursor, Read};

use serde::Serialize;
use zip::ZipArchive;
use zip::result::ZipError;

pub use entry::{Entry, content_path};
pub use error::ArchiveError;

use sdist::SDIST_USEFUL_FILENAMES;
use wheel::WHEEL_USEFUL_FILENAMES;

/// Container format of a published artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveKind {
    Wheel,
    GzipTarSdist,
    ZipSdist,
    Unsupported,
}

impl ArchiveKind {
    /// Classify by filename suffix. Total: anything unknown is `Unsupported`.
    pub fn classify(filename: &str) -> Self {
        if filename.ends_with(".whl") {
            ArchiveKind::Wheel
        } else if filename.ends_with(".tar.gz") {
            ArchiveKind::GzipTarSdist
        } else if filename.ends_with(".zip") {
            ArchiveKind::ZipSdist
        } else {
            ArchiveKind::Unsupported
        }
    }

    /// Members that can be read from this kind of archive.
    pub fn useful_filenames(&self) -> &'static [&'static str] {
        match self {
            ArchiveKind::Wheel => WHEEL_USEFUL_FILENAMES,
            ArchiveKind::GzipTarSdist | ArchiveKind::ZipSdist => SDIST_USEFUL_FILENAMES,
            ArchiveKind::Unsupported => &[],
        }
    }

    /// Strip the archive suffix: two dot-segments for `.tar.gz`, one otherwise.
    pub fn stem<'a>(&self, filename: &'a str) -> &'a str {
        let strip_one = |name: &'a str| name.rsplit_once('.').map_or(name, |(stem, _)| stem);
        match self {
            ArchiveKind::GzipTarSdist => strip_one(strip_one(filename)),
            _ => strip_one(filename),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ArchiveKind::Wheel => "wheel",
            ArchiveKind::GzipTarSdist => "sdist (tar.gz)",
            ArchiveKind::ZipSdist => "sdist (zip)",
            ArchiveKind::Unsupported => "unsupported",
        }
    }
}

impl std::fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Upper bound on the buffer reserved up front for a zip member. The size in
/// the central directory is untrusted, so larger members grow as they are read.
const MAX_PREALLOC: u64 = 1 << 20;

/// Read one member of a zip archive by exact name.
fn read_zip_member(content: &[u8], name: &str) -> Result<Vec<u8>, ArchiveError> {
    let mut archive = ZipArchive::new(Cursor::new(content))?;

    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Err(ArchiveError::NotFound(name.to_string())),
        Err(e) => return Err(e.into()),
    };

    if file.is_dir() {
        return Err(ArchiveError::NotFound(name.to_string()));
    }

    let mut buf = Vec::with_capacity(file.size().min(MAX_PREALLOC) as usize);
    file.read_to_end(&mut buf)?;
    Ok(buf)
}
