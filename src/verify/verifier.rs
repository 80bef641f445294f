use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::hash::AlgorithmMapping;
use crate::reader::BagReader;
use crate::types::{Bag, Manifest};
use crate::verify::checksum;
use crate::verify::mandatory::{
    check_bagit_file_exists, check_fetch_items_exist, check_payload_directory_exists,
    check_payload_manifest_exists,
};
use crate::verify::pool::WorkerPool;
use crate::verify::quick;
use crate::verify::tree::check_payload_tree;

/// entry point for bag verification
///
/// owns the hashing worker pool and the manifest-name mapping used to read
/// bags. call [`BagVerifier::close`] when done, or let it drop; either way
/// the worker threads are joined.
pub struct BagVerifier {
    pool: WorkerPool,
    reader: BagReader,
    ignore_hidden: bool,
}

impl BagVerifier {
    /// one worker per available cpu, hidden files ignored
    pub fn new() -> Result<Self> {
        Self::with_threads(0)
    }

    pub fn with_threads(threads: usize) -> Result<Self> {
        Ok(Self::with_pool(WorkerPool::new(threads)?, true))
    }

    /// reuse a pool the caller already started
    pub fn with_pool(pool: WorkerPool, ignore_hidden: bool) -> Self {
        Self {
            pool,
            reader: BagReader::new(),
            ignore_hidden,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::with_pool(
            WorkerPool::new(config.threads)?,
            config.ignore_hidden_files,
        ))
    }

    /// read manifests whose algorithm names the standard mapping rejects
    pub fn with_mapping(mut self, mapping: Arc<dyn AlgorithmMapping>) -> Self {
        self.reader = BagReader::with_mapping(mapping);
        self
    }

    /// read a bag with this verifier's algorithm mapping
    pub fn read_bag(&self, root: &Path) -> Result<Bag> {
        self.reader.read(root)
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// hidden-file default for [`BagVerifier::verify`]
    pub fn ignore_hidden(&self) -> bool {
        self.ignore_hidden
    }

    /// all files are present and accounted for, no checksums computed
    pub fn is_complete(&self, bag: &Bag, ignore_hidden: bool) -> Result<()> {
        tracing::info!("checking if bag at {} is complete", bag.root().display());
        let layout = bag.layout();

        check_fetch_items_exist(bag.items_to_fetch())?;
        check_bagit_file_exists(&layout)?;
        check_payload_directory_exists(&layout)?;
        check_payload_manifest_exists(&layout)?;
        check_payload_tree(bag, ignore_hidden)
    }

    /// complete, and every tag and payload checksum matches
    pub fn is_valid(&self, bag: &Bag, ignore_hidden: bool) -> Result<()> {
        tracing::info!("checking if bag at {} is valid", bag.root().display());
        self.is_complete(bag, ignore_hidden)?;

        for manifest in bag.tag_manifests() {
            self.verify_manifest(manifest)?;
        }
        for manifest in bag.payload_manifests() {
            self.verify_manifest(manifest)?;
        }
        Ok(())
    }

    /// [`BagVerifier::is_valid`] using the configured hidden-file policy
    pub fn verify(&self, bag: &Bag) -> Result<()> {
        self.is_valid(bag, self.ignore_hidden)
    }

    pub fn can_quick_verify(bag: &Bag) -> bool {
        quick::can_quick_verify(bag)
    }

    pub fn quickly_verify(bag: &Bag) -> Result<()> {
        quick::quickly_verify(bag)
    }

    /// every per-file failure of one manifest
    pub fn check_manifest(&self, manifest: &Manifest) -> Result<Vec<Error>> {
        checksum::check_manifest(&self.pool, manifest)
    }

    pub fn verify_manifest(&self, manifest: &Manifest) -> Result<()> {
        checksum::verify_manifest(&self.pool, manifest)
    }

    /// shut the worker pool down and wait for its threads
    pub fn close(mut self) {
        self.pool.shutdown();
    }
}
