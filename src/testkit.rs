//! on-disk bag fixtures for tests

use std::fs;
use std::path::{Path, PathBuf};

use crate::hash::{hash_bytes, Algorithm};
use crate::layout::{BagLayout, DECLARATION_FILE, FETCH_FILE, METADATA_FILE};
use crate::types::{ManifestKind, Version, PAYLOAD_OXUM};

/// writes a well formed bag of any version
pub struct BagBuilder {
    version: Version,
    payload: Vec<(String, Vec<u8>)>,
    algorithms: Vec<Algorithm>,
    tag_manifests: bool,
    metadata: Vec<(String, String)>,
    with_oxum: bool,
    fetch: Vec<String>,
}

impl BagBuilder {
    pub fn new(version: Version) -> Self {
        Self {
            version,
            payload: vec![],
            algorithms: vec![Algorithm::Sha256],
            tag_manifests: false,
            metadata: vec![],
            with_oxum: false,
            fetch: vec![],
        }
    }

    /// add a payload file, path relative to the payload directory
    pub fn payload(mut self, rel: &str, content: &[u8]) -> Self {
        self.payload.push((rel.to_string(), content.to_vec()));
        self
    }

    pub fn algorithms(mut self, algorithms: &[Algorithm]) -> Self {
        self.algorithms = algorithms.to_vec();
        self
    }

    pub fn tag_manifests(mut self, enabled: bool) -> Self {
        self.tag_manifests = enabled;
        self
    }

    pub fn metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.push((key.to_string(), value.to_string()));
        self
    }

    /// record the correct Payload-Oxum in bag-info.txt
    pub fn with_oxum(mut self) -> Self {
        self.with_oxum = true;
        self
    }

    /// add a raw fetch.txt line
    pub fn fetch(mut self, line: &str) -> Self {
        self.fetch.push(line.to_string());
        self
    }

    /// write the bag to `<parent>/bag` and return its root
    pub fn build(self, parent: &Path) -> PathBuf {
        let root = parent.join("bag");
        let layout = BagLayout::new(&root, self.version);
        let tag_dir = layout.tag_dir();
        let payload_dir = layout.payload_dir();
        fs::create_dir_all(&tag_dir).unwrap();
        fs::create_dir_all(&payload_dir).unwrap();

        let mut payload = self.payload.clone();
        payload.sort();

        for (rel, content) in &payload {
            let path = payload_dir.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, content).unwrap();
        }

        let mut tag_files = vec![];

        write(
            &tag_dir.join(DECLARATION_FILE),
            format!(
                "BagIt-Version: {}\nTag-File-Character-Encoding: UTF-8\n",
                self.version
            ),
            &mut tag_files,
        );

        for alg in &self.algorithms {
            let mut body = String::new();
            for (rel, content) in &payload {
                let listed = rel_to_root(&root, &payload_dir.join(rel));
                body.push_str(&format!("{}  {}\n", hash_bytes(content, *alg), listed));
            }
            write(
                &tag_dir.join(ManifestKind::Payload.file_name(*alg)),
                body,
                &mut tag_files,
            );
        }

        let mut info = String::new();
        for (k, v) in &self.metadata {
            info.push_str(&format!("{}: {}\n", k, v));
        }
        if self.with_oxum {
            let bytes: usize = payload.iter().map(|(_, c)| c.len()).sum();
            info.push_str(&format!("{}: {}.{}\n", PAYLOAD_OXUM, bytes, payload.len()));
        }
        if !info.is_empty() {
            write(&tag_dir.join(METADATA_FILE), info, &mut tag_files);
        }

        if !self.fetch.is_empty() {
            let mut body = self.fetch.join("\n");
            body.push('\n');
            write(&tag_dir.join(FETCH_FILE), body, &mut tag_files);
        }

        if self.tag_manifests {
            for alg in &self.algorithms {
                let mut body = String::new();
                for (path, content) in &tag_files {
                    body.push_str(&format!(
                        "{} {}\n",
                        hash_bytes(content, *alg),
                        rel_to_root(&root, path)
                    ));
                }
                fs::write(tag_dir.join(ManifestKind::Tag.file_name(*alg)), body).unwrap();
            }
        }

        root
    }
}

fn write(path: &Path, content: String, written: &mut Vec<(PathBuf, Vec<u8>)>) {
    fs::write(path, &content).unwrap();
    written.push((path.to_path_buf(), content.into_bytes()));
}

fn rel_to_root(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap().to_string_lossy().into_owned()
}
