//! bag-info.txt and its pre-0.96 name package-info.txt

use std::path::Path;

use crate::error::Result;
use crate::layout::{LEGACY_METADATA_FILE, METADATA_FILE};
use crate::reader::key_value::read_key_values;
use crate::types::{Encoding, Metadata};

/// read bag-info.txt, or package-info.txt for 0.93 - 0.95 bags
///
/// when both exist the legacy file wins, matching how those bags were written.
pub fn read_bag_metadata(tag_dir: &Path, encoding: Encoding) -> Result<Metadata> {
    tracing::info!("reading bag metadata in {}", tag_dir.display());
    let mut pairs = Vec::new();

    let bag_info = tag_dir.join(METADATA_FILE);
    if bag_info.is_file() {
        tracing::debug!("found metadata file {}", bag_info.display());
        pairs = read_key_values(&bag_info, ":", encoding)?;
    }

    let package_info = tag_dir.join(LEGACY_METADATA_FILE);
    if package_info.is_file() {
        tracing::debug!("found metadata file {}", package_info.display());
        pairs = read_key_values(&package_info, ":", encoding)?;
    }

    let mut metadata = Metadata::new();
    metadata.add_all(pairs);
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::PayloadOxum;
    use tempfile::tempdir;

    #[test]
    fn test_no_metadata_file() {
        let dir = tempdir().unwrap();
        let m = read_bag_metadata(dir.path(), Encoding::Utf8).unwrap();
        assert!(m.is_empty());
    }

    #[test]
    fn test_bag_info() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(METADATA_FILE),
            "Source-Organization: Library of Congress\n\
             Organization-Address: 101 Independence Ave\n  Washington, DC\n\
             Payload-Oxum: 25.5\n\
             Keyword: one\n\
             Keyword: two\n",
        )
        .unwrap();

        let m = read_bag_metadata(dir.path(), Encoding::Utf8).unwrap();
        assert_eq!(m.len(), 5);
        assert_eq!(
            m.first("Organization-Address"),
            Some("101 Independence Ave\n  Washington, DC")
        );
        assert_eq!(m.get("keyword"), vec!["one", "two"]);
        assert_eq!(m.payload_oxum(), Some(PayloadOxum::new(25, 5)));
    }

    #[test]
    fn test_legacy_package_info() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(LEGACY_METADATA_FILE), "Packing-Date: 2008-01-15\n").unwrap();

        let m = read_bag_metadata(dir.path(), Encoding::Utf8).unwrap();
        assert_eq!(m.first("Packing-Date"), Some("2008-01-15"));
    }

    #[test]
    fn test_malformed_metadata() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(METADATA_FILE), "no separator\n").unwrap();

        let err = read_bag_metadata(dir.path(), Encoding::Utf8).unwrap_err();
        assert!(matches!(err, Error::InvalidMetadata { .. }));
    }
}
