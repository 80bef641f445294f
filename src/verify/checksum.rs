//! parallel checksum verification of a manifest

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use crate::error::{Error, Result};
use crate::hash::{hash_file, Algorithm};
use crate::types::Manifest;
use crate::verify::pool::WorkerPool;
use crate::verify::tree::locate_listed;

/// hash one file and compare it to the manifest value
///
/// the file is looked up the same way the listed-files check finds it, so a
/// name stored in another unicode normalization form is still hashed. only a
/// file that is truly absent passes; the listed-files check reports it.
pub fn check_file(path: &Path, expected: &str, algorithm: Algorithm) -> Result<()> {
    let Some(on_disk) = locate_listed(path) else {
        tracing::debug!("skipping checksum of missing file {}", path.display());
        return Ok(());
    };

    let actual = hash_file(&on_disk, algorithm)?;
    if actual.eq_ignore_ascii_case(expected.trim()) {
        tracing::debug!("{} {} ok", algorithm, path.display());
        Ok(())
    } else {
        Err(Error::CorruptChecksum {
            path: path.to_path_buf(),
            algorithm: algorithm.bagit_name().to_string(),
            expected: expected.to_string(),
            actual,
        })
    }
}

/// verify every entry of a manifest on the pool and return each failure
///
/// all entries are checked even after a failure. the outer error only
/// reports that work could not be submitted.
pub fn check_manifest(pool: &WorkerPool, manifest: &Manifest) -> Result<Vec<Error>> {
    let algorithm = manifest.algorithm();
    tracing::info!(
        "checking {} {} checksums",
        manifest.len(),
        algorithm.bagit_name()
    );

    let (tx, rx) = mpsc::channel::<(PathBuf, Result<()>)>();
    let mut submitted = 0usize;

    for (path, expected) in manifest.entries() {
        let tx = tx.clone();
        let path = path.clone();
        let expected = expected.clone();

        pool.execute(move || {
            let outcome = catch_unwind(AssertUnwindSafe(|| check_file(&path, &expected, algorithm)))
                .unwrap_or_else(|_| Err(Error::TaskPanicked(path.clone())));
            let _ = tx.send((path, outcome));
        })?;
        submitted += 1;
    }
    drop(tx);

    let mut failures: Vec<(PathBuf, Error)> = Vec::new();
    let mut received = 0usize;
    while received < submitted {
        match rx.recv() {
            Ok((path, outcome)) => {
                received += 1;
                if let Err(e) = outcome {
                    tracing::warn!("{}", e);
                    failures.push((path, e));
                }
            }
            // every sender is gone, so no more reports can arrive
            Err(_) => break,
        }
    }

    if received < submitted {
        failures.push((
            PathBuf::new(),
            Error::TasksLost {
                missing: submitted - received,
                submitted,
            },
        ));
    }

    failures.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(failures.into_iter().map(|(_, e)| e).collect())
}

/// verify a manifest, failing on the first problem found
///
/// a checksum mismatch is reported as such; any other failure is wrapped
/// in [`Error::Verification`].
pub fn verify_manifest(pool: &WorkerPool, manifest: &Manifest) -> Result<()> {
    let failures = check_manifest(pool, manifest)?;
    first_failure(failures).map_or(Ok(()), Err)
}

fn first_failure(failures: Vec<Error>) -> Option<Error> {
    let mut other = None;
    for failure in failures {
        match failure {
            corrupt @ Error::CorruptChecksum { .. } => return Some(corrupt),
            e => {
                if other.is_none() {
                    other = Some(e);
                }
            }
        }
    }
    other.map(|e| Error::Verification(Box::new(e)))
}
