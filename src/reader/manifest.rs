//! payload and tag manifests

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, IoResultExt, Result};
use crate::hash::AlgorithmMapping;
use crate::reader::path::resolve;
use crate::reader::split_fields;
use crate::types::{Encoding, Manifest, ManifestKind};

/// payload and tag manifests found in a tag directory
#[derive(Debug, Default)]
pub struct Manifests {
    pub payload: Vec<Manifest>,
    pub tag: Vec<Manifest>,
}

/// classify a file name as a manifest, returning its kind and algorithm token
pub fn manifest_name(file_name: &str) -> Option<(ManifestKind, &str)> {
    let (kind, rest) = if let Some(rest) = file_name.strip_prefix(ManifestKind::Tag.file_prefix()) {
        (ManifestKind::Tag, rest)
    } else if let Some(rest) = file_name.strip_prefix(ManifestKind::Payload.file_prefix()) {
        (ManifestKind::Payload, rest)
    } else {
        return None;
    };

    let token = rest.strip_suffix(".txt")?;
    if token.is_empty() {
        return None;
    }
    Some((kind, token))
}

/// list manifest files in a tag directory, sorted by file name
pub fn find_manifest_files(tag_dir: &Path) -> Result<Vec<(ManifestKind, PathBuf)>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(tag_dir).with_path(tag_dir)? {
        let entry = entry.with_path(tag_dir)?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if let Some((kind, _)) = manifest_name(name) {
            if entry.path().is_file() {
                found.push((kind, entry.path()));
            }
        }
    }
    found.sort_by(|a, b| a.1.cmp(&b.1));
    Ok(found)
}

/// read every manifest in the tag directory
pub fn read_all_manifests(
    mapping: &dyn AlgorithmMapping,
    tag_dir: &Path,
    bag_root: &Path,
    encoding: Encoding,
) -> Result<Manifests> {
    tracing::info!("reading manifests in {}", tag_dir.display());
    let mut manifests = Manifests::default();

    for (kind, path) in find_manifest_files(tag_dir)? {
        let manifest = read_manifest(mapping, &path, bag_root, encoding)?;
        match kind {
            ManifestKind::Payload => {
                tracing::debug!("found payload manifest {}", path.display());
                manifests.payload.push(manifest);
            }
            ManifestKind::Tag => {
                tracing::debug!("found tag manifest {}", path.display());
                manifests.tag.push(manifest);
            }
        }
    }

    Ok(manifests)
}

/// read one manifest file
///
/// the algorithm comes from the file name, `<prefix>-<algorithm>.txt`.
pub fn read_manifest(
    mapping: &dyn AlgorithmMapping,
    manifest_file: &Path,
    bag_root: &Path,
    encoding: Encoding,
) -> Result<Manifest> {
    tracing::debug!("reading manifest {}", manifest_file.display());

    let file_name = manifest_file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");
    let (kind, token) = manifest_name(file_name).ok_or_else(|| {
        Error::InvalidFormat(format!(
            "{} is not named like a manifest (manifest-<algorithm>.txt)",
            manifest_file.display()
        ))
    })?;
    let algorithm = mapping.algorithm(token)?;

    let text = encoding.read_to_string(manifest_file)?;
    let mut manifest = Manifest::new(algorithm, kind);

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let (checksum, raw_path) = parse_manifest_line(line, manifest_file)?;
        let path = resolve(bag_root, raw_path)?;
        tracing::debug!(
            "read checksum [{}] for {} from {}",
            checksum,
            path.display(),
            manifest_file.display()
        );
        if manifest.insert(path.clone(), checksum.to_string()).is_some() {
            tracing::debug!("{} is listed more than once, keeping the last checksum", path.display());
        }
    }

    Ok(manifest)
}

/// split `<checksum><whitespace><path>`
pub fn parse_manifest_line<'a>(line: &'a str, manifest_file: &Path) -> Result<(&'a str, &'a str)> {
    match split_fields(line, 2).as_slice() {
        [checksum, path] => Ok((*checksum, *path)),
        _ => Err(Error::InvalidFormat(format!(
            "line [{}] in {} is not of the form <checksum> <path>",
            line,
            manifest_file.display()
        ))),
    }
}
