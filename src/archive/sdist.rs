//! Sdist member lookup, for `.tar.gz` and `.zip` source distributions.

use std::collections::HashMap;
use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive;
use tracing::debug;

use super::error::ArchiveError;
use super::read_zip_member;

pub const SDIST_USEFUL_FILENAMES: &[&str] = &["pyproject.toml", "setup.cfg", "setup.py"];

/// Member paths tried for `name`, in order: the bare name, then the name
/// under the conventional `{stem}/` top-level directory.
pub fn tgz_candidates(stem: &str, name: &str) -> [String; 2] {
    [name.to_string(), format!("{}/{}", stem, name)]
}

/// Read `name` from a gzipped tarball.
///
/// Tar has no index, so the archive is scanned once to pick the member and
/// once more to unpack just that member into a scratch directory under the
/// system temp dir. The scratch directory is removed before returning.
pub fn read_tgz_member(content: &[u8], stem: &str, name: &str) -> Result<Vec<u8>, ArchiveError> {
    read_tgz_member_in(content, stem, name, &std::env::temp_dir())
}

fn read_tgz_member_in(
    content: &[u8],
    stem: &str,
    name: &str,
    scratch_root: &Path,
) -> Result<Vec<u8>, ArchiveError> {
    let (member, position) = find_tgz_member(content, stem, name)?;
    debug!(member = %member, position, "resolved sdist member");

    let scratch = tempfile::Builder::new()
        .prefix("wfb-")
        .tempdir_in(scratch_root)?;

    let mut archive = Archive::new(GzDecoder::new(content));
    for (index, entry) in archive.entries()?.enumerate() {
        let mut entry = entry?;
        if index != position {
            continue;
        }

        if !entry.header().entry_type().is_file() {
            return Err(ArchiveError::Read(format!("{} is not a regular file", member)));
        }

        if !entry.unpack_in(scratch.path())? {
            return Err(ArchiveError::Read(format!("refusing to unpack {}", member)));
        }

        return Ok(std::fs::read(scratch.path().join(&member))?);
    }

    Err(ArchiveError::NotFound(member))
}

/// First candidate path that names a member of the tarball, with the
/// position of that member.
///
/// A path stored more than once resolves to its last occurrence, the one a
/// sequential extraction would leave on disk.
fn find_tgz_member(
    content: &[u8],
    stem: &str,
    name: &str,
) -> Result<(String, usize), ArchiveError> {
    let mut archive = Archive::new(GzDecoder::new(content));
    let mut positions = HashMap::new();
    for (index, entry) in archive.entries()?.enumerate() {
        let entry = entry?;
        positions.insert(member_name(&entry.path()?), index);
    }

    tgz_candidates(stem, name)
        .into_iter()
        .find_map(|candidate| {
            let position = positions.get(&candidate).copied()?;
            Some((candidate, position))
        })
        .ok_or_else(|| ArchiveError::NotFound(name.to_string()))
}

fn member_name(path: &Path) -> String {
    path.to_string_lossy().trim_end_matches('/').to_string()
}

/// Read `name` from a zip sdist. Only the bare name is tried.
pub(super) fn read_zip_sdist_member(content: &[u8], name: &str) -> Result<Vec<u8>, ArchiveError> {
    read_zip_member(content, name)
}
