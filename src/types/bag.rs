use std::collections::HashMap;
use std::path::{Path, PathBuf};

use url::Url;

use crate::hash::Algorithm;
use crate::layout::BagLayout;
use crate::types::{Encoding, Metadata, PayloadOxum, Version};

/// whether a manifest covers payload or tag files
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ManifestKind {
    /// `manifest-<alg>.txt`
    Payload,
    /// `tagmanifest-<alg>.txt`
    Tag,
}

impl ManifestKind {
    pub fn file_prefix(&self) -> &'static str {
        match self {
            ManifestKind::Payload => "manifest-",
            ManifestKind::Tag => "tagmanifest-",
        }
    }

    pub fn file_name(&self, algorithm: Algorithm) -> String {
        format!("{}{}.txt", self.file_prefix(), algorithm.bagit_name())
    }
}

/// checksums for one algorithm, keyed by resolved absolute path
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Manifest {
    algorithm: Algorithm,
    kind: ManifestKind,
    entries: HashMap<PathBuf, String>,
}

impl Manifest {
    pub fn new(algorithm: Algorithm, kind: ManifestKind) -> Self {
        Self {
            algorithm,
            kind,
            entries: HashMap::new(),
        }
    }

    pub fn with_entries(
        algorithm: Algorithm,
        kind: ManifestKind,
        entries: HashMap<PathBuf, String>,
    ) -> Self {
        Self {
            algorithm,
            kind,
            entries,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn kind(&self) -> ManifestKind {
        self.kind
    }

    pub fn is_payload(&self) -> bool {
        self.kind == ManifestKind::Payload
    }

    pub fn entries(&self) -> &HashMap<PathBuf, String> {
        &self.entries
    }

    pub fn checksum(&self, path: &Path) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// record or replace the checksum for a path
    pub fn insert(&mut self, path: PathBuf, checksum: String) -> Option<String> {
        self.entries.insert(path, checksum)
    }
}

/// one line of fetch.txt
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchItem {
    pub url: Url,
    /// expected size in bytes; `None` when the file lists `-`
    pub length: Option<u64>,
    /// destination, already resolved inside the bag root
    pub path: PathBuf,
}

impl FetchItem {
    pub fn new(url: Url, length: Option<u64>, path: PathBuf) -> Self {
        Self { url, length, path }
    }
}

impl std::fmt::Display for FetchItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.length {
            Some(len) => write!(f, "{} {} {}", self.url, len, self.path.display()),
            None => write!(f, "{} - {}", self.url, self.path.display()),
        }
    }
}

/// a bag as read from disk
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bag {
    pub(crate) root: PathBuf,
    pub(crate) version: Version,
    pub(crate) encoding: Encoding,
    pub(crate) declaration_lines: Vec<String>,
    pub(crate) payload_manifests: Vec<Manifest>,
    pub(crate) tag_manifests: Vec<Manifest>,
    pub(crate) metadata: Metadata,
    pub(crate) items_to_fetch: Vec<FetchItem>,
    pub(crate) payload_oxum: Option<PayloadOxum>,
}

impl Bag {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// encoding used by every tag file except bagit.txt
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// bagit.txt exactly as read, one entry per line
    pub fn declaration_lines(&self) -> &[String] {
        &self.declaration_lines
    }

    pub fn payload_manifests(&self) -> &[Manifest] {
        &self.payload_manifests
    }

    pub fn tag_manifests(&self) -> &[Manifest] {
        &self.tag_manifests
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn items_to_fetch(&self) -> &[FetchItem] {
        &self.items_to_fetch
    }

    /// byte and file totals declared in the bag metadata
    pub fn payload_oxum(&self) -> Option<PayloadOxum> {
        self.payload_oxum
    }

    /// version-driven locations of this bag's files
    pub fn layout(&self) -> BagLayout {
        BagLayout::new(&self.root, self.version)
    }

    /// every path listed in any payload or tag manifest
    pub fn all_listed_files(&self) -> impl Iterator<Item = &PathBuf> {
        self.payload_manifests
            .iter()
            .chain(self.tag_manifests.iter())
            .flat_map(|m| m.entries().keys())
    }
}
