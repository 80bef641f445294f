//! the bag reader facade

use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, IoResultExt, Result};
use crate::hash::{AlgorithmMapping, StandardAlgorithmMapping};
use crate::layout::{BagLayout, DECLARATION_FILE};
use crate::reader::declaration::read_declaration;
use crate::reader::fetch::read_fetch;
use crate::reader::manifest::read_all_manifests;
use crate::reader::metadata::read_bag_metadata;
use crate::reader::path::normalize;
use crate::types::Bag;

/// reads a bag from the filesystem in one pass
///
/// the result is either a complete [`Bag`] or the first error encountered;
/// no partially read bag is ever returned.
#[derive(Clone)]
pub struct BagReader {
    mapping: Arc<dyn AlgorithmMapping>,
}

impl Default for BagReader {
    fn default() -> Self {
        Self::new()
    }
}

impl BagReader {
    pub fn new() -> Self {
        Self {
            mapping: Arc::new(StandardAlgorithmMapping),
        }
    }

    /// use a custom manifest-name to algorithm mapping
    pub fn with_mapping(mapping: Arc<dyn AlgorithmMapping>) -> Self {
        Self { mapping }
    }

    pub fn mapping(&self) -> &Arc<dyn AlgorithmMapping> {
        &self.mapping
    }

    pub fn read(&self, root: &Path) -> Result<Bag> {
        let root = normalize(&std::path::absolute(root).with_path(root)?);
        tracing::info!("reading bag at {}", root.display());

        let found_in = BagLayout::discover_tag_dir(&root);
        let declaration = read_declaration(&found_in.join(DECLARATION_FILE))?;
        let encoding = declaration.encoding;

        let layout = BagLayout::new(&root, declaration.version);
        let tag_dir = layout.tag_dir();
        if tag_dir != found_in {
            return Err(Error::InvalidFormat(format!(
                "bagit.txt found in {} declares version {}, which keeps tag files in {}",
                found_in.display(),
                declaration.version,
                tag_dir.display()
            )));
        }

        let manifests = read_all_manifests(self.mapping.as_ref(), &tag_dir, &root, encoding)?;
        let metadata = read_bag_metadata(&tag_dir, encoding)?;

        let fetch_file = layout.fetch_file();
        let items_to_fetch = if fetch_file.is_file() {
            read_fetch(&fetch_file, encoding, &root)?
        } else {
            vec![]
        };

        let payload_oxum = metadata.payload_oxum();

        Ok(Bag {
            root,
            version: declaration.version,
            encoding,
            declaration_lines: declaration.lines,
            payload_manifests: manifests.payload,
            tag_manifests: manifests.tag,
            metadata,
            items_to_fetch,
            payload_oxum,
        })
    }
}

/// read a bag with the standard algorithm names
pub fn read_bag(root: &Path) -> Result<Bag> {
    BagReader::new().read(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Algorithm;
    use crate::testkit::BagBuilder;
    use crate::types::{Encoding, PayloadOxum, Version};
    use tempfile::tempdir;

    #[test]
    fn test_read_v1_bag() {
        let dir = tempdir().unwrap();
        let root = BagBuilder::new(Version::V1_0)
            .payload("a.txt", b"alpha")
            .payload("sub/b.txt", b"bravo")
            .algorithms(&[Algorithm::Sha256, Algorithm::Md5])
            .tag_manifests(true)
            .metadata("Source-Organization", "test")
            .with_oxum()
            .build(dir.path());

        let bag = read_bag(&root).unwrap();
        assert_eq!(bag.version(), Version::V1_0);
        assert_eq!(bag.encoding(), Encoding::Utf8);
        assert_eq!(bag.payload_manifests().len(), 2);
        assert_eq!(bag.tag_manifests().len(), 2);
        assert_eq!(bag.payload_oxum(), Some(PayloadOxum::new(10, 2)));
        assert!(bag.items_to_fetch().is_empty());

        let sha = bag
            .payload_manifests()
            .iter()
            .find(|m| m.algorithm() == Algorithm::Sha256)
            .unwrap();
        assert!(sha.contains(&root.join("data/sub/b.txt")));
    }

    #[test]
    fn test_declaration_lines_are_kept() {
        let dir = tempdir().unwrap();
        let root = BagBuilder::new(Version::V1_0)
            .payload("a.txt", b"alpha")
            .build(&dir.path().join("new"));
        let bag = read_bag(&root).unwrap();
        assert_eq!(
            bag.declaration_lines(),
            ["BagIt-Version: 1.0", "Tag-File-Character-Encoding: UTF-8"]
        );

        let old = BagBuilder::new(Version::new(0, 96))
            .payload("a.txt", b"alpha")
            .build(&dir.path().join("old"));
        std::fs::write(
            old.join(DECLARATION_FILE),
            "BagIt-Version : 0.96\nTag-File-Character-Encoding :  UTF-8\nContact: nobody\n",
        )
        .unwrap();
        let bag = read_bag(&old).unwrap();
        assert_eq!(bag.declaration_lines().len(), 3);
        assert_eq!(bag.declaration_lines()[2], "Contact: nobody");
    }

    #[test]
    fn test_tag_dir_must_match_declared_version() {
        let dir = tempdir().unwrap();
        let root = BagBuilder::new(Version::V2_0)
            .payload("a.txt", b"alpha")
            .build(dir.path());
        std::fs::write(
            root.join(".bagit").join(DECLARATION_FILE),
            "BagIt-Version: 1.0\nTag-File-Character-Encoding: UTF-8\n",
        )
        .unwrap();

        assert!(matches!(read_bag(&root), Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn test_read_dot_bagit_bag() {
        let dir = tempdir().unwrap();
        let root = BagBuilder::new(Version::V2_0)
            .payload("a.txt", b"alpha")
            .build(dir.path());

        let bag = read_bag(&root).unwrap();
        assert_eq!(bag.version(), Version::V2_0);
        assert_eq!(bag.layout().payload_dir(), root);
        assert!(bag.payload_manifests()[0].contains(&root.join("a.txt")));
    }

    #[test]
    fn test_relative_root_is_made_absolute() {
        let dir = tempdir().unwrap();
        let root = BagBuilder::new(Version::V1_0)
            .payload("a.txt", b"alpha")
            .build(dir.path());

        let bag = read_bag(&root.join("data/..")).unwrap();
        assert!(bag.root().is_absolute());
        assert_eq!(bag.root(), root);
    }

    #[test]
    fn test_read_fetch_items() {
        let dir = tempdir().unwrap();
        let root = BagBuilder::new(Version::new(0, 97))
            .payload("a.txt", b"alpha")
            .fetch("http://example.com/b.txt - data/b.txt")
            .build(dir.path());

        let bag = read_bag(&root).unwrap();
        assert_eq!(bag.items_to_fetch().len(), 1);
        assert_eq!(bag.items_to_fetch()[0].path, root.join("data/b.txt"));
    }

    #[test]
    fn test_malicious_fetch_aborts_read() {
        let dir = tempdir().unwrap();
        let root = BagBuilder::new(Version::new(0, 97))
            .payload("a.txt", b"alpha")
            .fetch("http://example.com/evil - ~/evil.txt")
            .build(dir.path());

        assert!(matches!(read_bag(&root), Err(Error::MaliciousPath(_))));
        assert!(!dir.path().join("evil.txt").exists());
    }

    #[test]
    fn test_missing_declaration() {
        let dir = tempdir().unwrap();
        assert!(matches!(read_bag(dir.path()), Err(Error::Io { .. })));
    }
}
