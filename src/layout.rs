//! version-driven bag layout
//!
//! every rule that differs between bagit versions lives here instead of in
//! the readers and verifiers:
//!
//! | version      | tag files | payload  | declaration form | payload coverage |
//! |--------------|-----------|----------|------------------|------------------|
//! | < 1.0        | root      | `data/`  | lenient          | any manifest     |
//! | 1.0 .. 2.0   | root      | `data/`  | strict two-line  | every manifest   |
//! | >= 2.0       | `.bagit/` | root     | strict two-line  | every manifest   |

use std::path::{Path, PathBuf};

use crate::types::Version;

pub const DECLARATION_FILE: &str = "bagit.txt";
pub const METADATA_FILE: &str = "bag-info.txt";
/// only written by versions 0.93 - 0.95
pub const LEGACY_METADATA_FILE: &str = "package-info.txt";
pub const FETCH_FILE: &str = "fetch.txt";
pub const PAYLOAD_DIR: &str = "data";
pub const DOT_BAGIT_DIR: &str = ".bagit";

/// where a bag of a given version keeps its files
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BagLayout {
    root: PathBuf,
    version: Version,
}

impl BagLayout {
    pub fn new(root: &Path, version: Version) -> Self {
        Self {
            root: root.to_path_buf(),
            version,
        }
    }

    /// tag directory of a bag whose version is not known yet
    pub fn discover_tag_dir(root: &Path) -> PathBuf {
        let dot_bagit = root.join(DOT_BAGIT_DIR);
        if dot_bagit.is_dir() {
            dot_bagit
        } else {
            root.to_path_buf()
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn version(&self) -> Version {
        self.version
    }

    fn uses_dot_bagit(&self) -> bool {
        self.version.is_same_or_newer(Version::V2_0)
    }

    /// directory holding bagit.txt, manifests, bag-info.txt and fetch.txt
    pub fn tag_dir(&self) -> PathBuf {
        if self.uses_dot_bagit() {
            self.root.join(DOT_BAGIT_DIR)
        } else {
            self.root.clone()
        }
    }

    pub fn payload_dir(&self) -> PathBuf {
        if self.uses_dot_bagit() {
            self.root.clone()
        } else {
            self.root.join(PAYLOAD_DIR)
        }
    }

    pub fn declaration_file(&self) -> PathBuf {
        self.tag_dir().join(DECLARATION_FILE)
    }

    pub fn fetch_file(&self) -> PathBuf {
        self.tag_dir().join(FETCH_FILE)
    }

    /// bagit.txt must be exactly the two canonical lines
    pub fn strict_declaration(&self) -> bool {
        Self::declaration_is_strict(self.version)
    }

    /// whether a declaration of `version` must use the strict two-line form;
    /// needed before the bag root is known
    pub fn declaration_is_strict(version: Version) -> bool {
        version.is_same_or_newer(Version::V1_0)
    }

    /// every payload file must appear in every payload manifest,
    /// rather than in at least one manifest of any kind
    pub fn requires_every_manifest(&self) -> bool {
        self.version.is_same_or_newer(Version::V1_0)
    }
}
