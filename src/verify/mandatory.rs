//! structural checks every complete bag must pass

use std::fs;

use crate::error::{Error, IoResultExt, Result};
use crate::layout::BagLayout;
use crate::reader::manifest::manifest_name;
use crate::types::{FetchItem, ManifestKind};

/// every fetch item must already be present at its destination
pub fn check_fetch_items_exist(items: &[FetchItem]) -> Result<()> {
    tracing::info!("checking that all {} fetch items exist", items.len());
    for item in items {
        if !item.path.exists() {
            return Err(Error::MissingFetchTarget {
                url: item.url.to_string(),
                path: item.path.clone(),
            });
        }
    }
    Ok(())
}

pub fn check_bagit_file_exists(layout: &BagLayout) -> Result<()> {
    let declaration = layout.declaration_file();
    tracing::info!("checking that {} exists", declaration.display());
    if !declaration.is_file() {
        return Err(Error::MissingBagitFile(declaration));
    }
    Ok(())
}

pub fn check_payload_directory_exists(layout: &BagLayout) -> Result<()> {
    let payload_dir = layout.payload_dir();
    tracing::info!("checking that payload directory {} exists", payload_dir.display());
    if !payload_dir.is_dir() {
        return Err(Error::MissingPayloadDirectory(payload_dir));
    }
    Ok(())
}

/// at least one `manifest-<alg>.txt` must sit in the tag directory
pub fn check_payload_manifest_exists(layout: &BagLayout) -> Result<()> {
    let tag_dir = layout.tag_dir();
    tracing::info!("checking for a payload manifest in {}", tag_dir.display());

    for entry in fs::read_dir(&tag_dir).with_path(&tag_dir)? {
        let entry = entry.with_path(&tag_dir)?;
        let name = entry.file_name();
        let is_payload_manifest = matches!(
            manifest_name(&name.to_string_lossy()),
            Some((ManifestKind::Payload, _))
        );
        if is_payload_manifest && entry.path().is_file() {
            return Ok(());
        }
    }

    Err(Error::MissingPayloadManifest(tag_dir))
}
