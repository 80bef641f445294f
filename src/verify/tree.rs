//! consistency between manifests and the files on disk

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::types::{Bag, Manifest};
use crate::verify::walk::{dir_entry_names, TreeWalk};

fn nfd(s: &str) -> String {
    s.nfd().collect()
}

/// nfd form of a path, `None` when the path is not valid unicode
///
/// non-unicode names only ever match byte for byte.
fn nfd_path(path: &Path) -> Option<String> {
    path.to_str().map(nfd)
}

/// the on-disk path of a listed file
///
/// an exact match wins; otherwise a sibling whose name differs only in
/// unicode normalization form is accepted. `None` means the file is absent.
pub fn locate_listed(path: &Path) -> Option<PathBuf> {
    if path.exists() {
        return Some(path.to_path_buf());
    }

    let parent = path.parent()?;
    let wanted = nfd(path.file_name()?.to_str()?);
    let siblings: Vec<OsString> = dir_entry_names(parent).ok()?;

    let found = siblings
        .iter()
        .find(|s| s.to_str().is_some_and(|s| nfd(s) == wanted))?;
    let found = parent.join(found);
    tracing::warn!(
        "{} was found as {} after unicode normalization",
        path.display(),
        found.display()
    );
    Some(found)
}

/// every file in every payload and tag manifest exists on disk
///
/// all missing files are gathered before failing.
pub fn check_listed_files_exist(bag: &Bag) -> Result<()> {
    tracing::info!("checking that all files listed in the manifests exist");

    let listed: HashSet<&PathBuf> = bag.all_listed_files().collect();
    let mut missing: Vec<PathBuf> = listed
        .into_iter()
        .filter(|p| locate_listed(p).is_none())
        .cloned()
        .collect();

    if missing.is_empty() {
        return Ok(());
    }
    missing.sort();
    Err(Error::FileNotInPayloadDirectory(missing))
}

/// lookup set over manifest paths with a normalization-insensitive fallback
struct ListedPaths<'a> {
    exact: HashSet<&'a Path>,
    normalized: HashSet<String>,
}

impl<'a> ListedPaths<'a> {
    fn new(paths: impl Iterator<Item = &'a PathBuf>) -> Self {
        let exact: HashSet<&Path> = paths.map(PathBuf::as_path).collect();
        let normalized = exact.iter().filter_map(|p| nfd_path(p)).collect();
        Self { exact, normalized }
    }

    fn contains(&self, path: &Path) -> bool {
        self.exact.contains(path)
            || nfd_path(path).is_some_and(|p| self.normalized.contains(&p))
    }
}

/// every payload file is listed in every payload manifest
pub fn check_payload_in_every_manifest(
    manifests: &[Manifest],
    payload_dir: &Path,
    ignore_hidden: bool,
) -> Result<()> {
    tracing::info!("checking that every payload file is listed in every payload manifest");

    let indexes: Vec<(String, ListedPaths)> = manifests
        .iter()
        .map(|m| {
            (
                m.algorithm().bagit_name().to_string(),
                ListedPaths::new(m.entries().keys()),
            )
        })
        .collect();

    TreeWalk::new(payload_dir)
        .ignore_hidden(ignore_hidden)
        .files(|path, _| {
            for (algorithm, listed) in &indexes {
                if !listed.contains(path) {
                    return Err(Error::FileNotInManifest {
                        path: path.to_path_buf(),
                        algorithm: Some(algorithm.clone()),
                    });
                }
            }
            Ok(())
        })
}

/// every payload file is listed in at least one payload or tag manifest
pub fn check_payload_in_any_manifest(bag: &Bag, payload_dir: &Path, ignore_hidden: bool) -> Result<()> {
    tracing::info!("checking that every payload file is listed in at least one manifest");

    let listed = ListedPaths::new(bag.all_listed_files());

    TreeWalk::new(payload_dir)
        .ignore_hidden(ignore_hidden)
        .files(|path, _| {
            if listed.contains(path) {
                Ok(())
            } else {
                Err(Error::FileNotInManifest {
                    path: path.to_path_buf(),
                    algorithm: None,
                })
            }
        })
}

/// presence of listed files, then the coverage rule for the bag's version
pub fn check_payload_tree(bag: &Bag, ignore_hidden: bool) -> Result<()> {
    check_listed_files_exist(bag)?;

    let layout = bag.layout();
    let payload_dir = layout.payload_dir();
    if layout.requires_every_manifest() {
        check_payload_in_every_manifest(bag.payload_manifests(), &payload_dir, ignore_hidden)
    } else {
        check_payload_in_any_manifest(bag, &payload_dir, ignore_hidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::{hash_bytes, Algorithm};
    use crate::reader::read_bag;
    use crate::testkit::BagBuilder;
    use crate::types::{ManifestKind, Version};
    use std::fs;
    use tempfile::tempdir;

    fn five_file_bag(parent: &Path, version: Version) -> PathBuf {
        BagBuilder::new(version)
            .payload("one.txt", b"1")
            .payload("two.txt", b"22")
            .payload("sub/three.txt", b"333")
            .payload("sub/four.txt", b"4444")
            .payload("sub/deeper/five.txt", b"55555")
            .build(parent)
    }

    #[test]
    fn test_complete_tree() {
        let dir = tempdir().unwrap();
        let root = five_file_bag(dir.path(), Version::V1_0);
        let bag = read_bag(&root).unwrap();
        check_payload_tree(&bag, true).unwrap();
    }

    #[test]
    fn test_missing_files_are_collected() {
        let dir = tempdir().unwrap();
        let root = five_file_bag(dir.path(), Version::V1_0);
        fs::remove_file(root.join("data/one.txt")).unwrap();
        fs::remove_file(root.join("data/sub/four.txt")).unwrap();

        let bag = read_bag(&root).unwrap();
        let err = check_payload_tree(&bag, true).unwrap_err();
        match err {
            Error::FileNotInPayloadDirectory(missing) => {
                assert_eq!(
                    missing,
                    vec![root.join("data/one.txt"), root.join("data/sub/four.txt")]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unlisted_file() {
        let dir = tempdir().unwrap();
        let root = five_file_bag(dir.path(), Version::V1_0);
        fs::write(root.join("data/extra.txt"), b"surprise").unwrap();

        let bag = read_bag(&root).unwrap();
        let err = check_payload_tree(&bag, true).unwrap_err();
        assert!(matches!(
            err,
            Error::FileNotInManifest { ref path, algorithm: Some(_) } if path.ends_with("extra.txt")
        ));
    }

    #[test]
    fn test_hidden_files() {
        let dir = tempdir().unwrap();
        let root = five_file_bag(dir.path(), Version::V1_0);
        fs::write(root.join("data/.DS_Store"), b"finder").unwrap();

        let bag = read_bag(&root).unwrap();
        check_payload_tree(&bag, true).unwrap();
        assert!(matches!(
            check_payload_tree(&bag, false),
            Err(Error::FileNotInManifest { .. })
        ));
    }

    #[test]
    fn test_every_manifest_vs_any_manifest() {
        let dir = tempdir().unwrap();

        // a second payload manifest that is missing one file
        let write_partial_md5 = |root: &Path| {
            fs::write(
                root.join(ManifestKind::Payload.file_name(Algorithm::Md5)),
                format!("{}  data/a.txt\n", hash_bytes(b"alpha", Algorithm::Md5)),
            )
            .unwrap();
        };

        let old = BagBuilder::new(Version::new(0, 97))
            .payload("a.txt", b"alpha")
            .payload("b.txt", b"bravo")
            .build(&dir.path().join("old"));
        write_partial_md5(&old);
        check_payload_tree(&read_bag(&old).unwrap(), true).unwrap();

        let new = BagBuilder::new(Version::V1_0)
            .payload("a.txt", b"alpha")
            .payload("b.txt", b"bravo")
            .build(&dir.path().join("new"));
        write_partial_md5(&new);
        let err = check_payload_tree(&read_bag(&new).unwrap(), true).unwrap_err();
        assert!(matches!(
            err,
            Error::FileNotInManifest { ref path, algorithm: Some(ref alg) }
                if path.ends_with("b.txt") && alg == "md5"
        ));
    }

    #[test]
    fn test_unlisted_file_in_old_bag_names_no_manifest() {
        let dir = tempdir().unwrap();
        let root = five_file_bag(dir.path(), Version::new(0, 97));
        fs::write(root.join("data/extra.txt"), b"surprise").unwrap();

        let err = check_payload_tree(&read_bag(&root).unwrap(), true).unwrap_err();
        assert!(matches!(err, Error::FileNotInManifest { algorithm: None, .. }));
    }

    #[test]
    fn test_normalization_tolerance() {
        let dir = tempdir().unwrap();
        let composed = "caf\u{e9}.txt";
        let decomposed = "cafe\u{301}.txt";

        // listed composed, stored decomposed
        let root = BagBuilder::new(Version::V1_0)
            .payload(composed, b"coffee")
            .build(dir.path());
        fs::rename(root.join("data").join(composed), root.join("data").join(decomposed)).unwrap();

        let bag = read_bag(&root).unwrap();
        check_listed_files_exist(&bag).unwrap();
        check_payload_tree(&bag, true).unwrap();
    }

    #[test]
    fn test_dot_bagit_payload_at_root() {
        let dir = tempdir().unwrap();
        let root = five_file_bag(dir.path(), Version::V2_0);
        let bag = read_bag(&root).unwrap();
        check_payload_tree(&bag, true).unwrap();

        fs::write(root.join("loose.txt"), b"x").unwrap();
        assert!(matches!(
            check_payload_tree(&bag, true),
            Err(Error::FileNotInManifest { .. })
        ));
    }
}
