//! Wheel member lookup.

use super::error::ArchiveError;
use super::read_zip_member;

pub const WHEEL_USEFUL_FILENAMES: &[&str] = &["METADATA"];

/// Path of the METADATA file, derived from the wheel filename.
///
/// Takes `{name}-{version}` from the filename and assumes the standard
/// `{name}-{version}.dist-info/` directory. Wheels whose dist-info directory
/// is spelled differently are not found.
pub fn metadata_path(wheel_filename: &str) -> String {
    let name_version: Vec<&str> = wheel_filename.splitn(3, '-').take(2).collect();
    format!("{}.dist-info/METADATA", name_version.join("-"))
}

/// Read `name` from a wheel. Only `METADATA` is supported.
pub(super) fn read_member(
    content: &[u8],
    wheel_filename: &str,
    name: &str,
) -> Result<Vec<u8>, ArchiveError> {
    if name != "METADATA" {
        return Err(ArchiveError::NotFound(name.to_string()));
    }

    read_zip_member(content, &metadata_path(wheel_filename))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::fixtures::zip_archive;

    #[test]
    fn test_metadata_path() {
        assert_eq!(
            metadata_path("requests-2.31.0-py3-none-any.whl"),
            "requests-2.31.0.dist-info/METADATA"
        );
        assert_eq!(
            metadata_path("numpy-1.26.4-cp312-cp312-manylinux_2_17_x86_64.whl"),
            "numpy-1.26.4.dist-info/METADATA"
        );
    }

    #[test]
    fn test_metadata_path_build_tag_is_ignored() {
        // Build tags sit after the version and never reach the directory name.
        assert_eq!(
            metadata_path("demo-1.0-1-py3-none-any.whl"),
            "demo-1.0.dist-info/METADATA"
        );
    }

    #[test]
    fn test_metadata_path_without_dashes() {
        assert_eq!(metadata_path("odd.whl"), "odd.whl.dist-info/METADATA");
    }

    #[test]
    fn test_read_metadata() {
        let wheel = zip_archive(&[
            ("demo/__init__.py", ""),
            ("demo-1.0.dist-info/METADATA", "Name: demo\nVersion: 1.0\n"),
        ]);

        let content = read_member(&wheel, "demo-1.0-py3-none-any.whl", "METADATA").unwrap();
        assert_eq!(content, b"Name: demo\nVersion: 1.0\n");
    }

    #[test]
    fn test_nonstandard_dist_info_is_not_found() {
        let wheel = zip_archive(&[("Demo-1.0.dist-info/METADATA", "Name: Demo\n")]);

        let err = read_member(&wheel, "demo-1.0-py3-none-any.whl", "METADATA").unwrap_err();
        assert!(matches!(err, ArchiveError::NotFound(ref p) if p == "demo-1.0.dist-info/METADATA"));
    }

    #[test]
    fn test_other_names_rejected() {
        let wheel = zip_archive(&[("demo-1.0.dist-info/RECORD", "")]);

        let err = read_member(&wheel, "demo-1.0-py3-none-any.whl", "RECORD").unwrap_err();
        assert!(matches!(err, ArchiveError::NotFound(_)));
    }
}
