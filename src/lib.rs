//! bagit - BagIt package reader and verifier
//!
//! reads bags written to any published version of the BagIt format (0.93
//! through 1.0, plus the `.bagit/` layout of 2.0) and checks them for
//! completeness, full validity, or a cheap size/count match.
//!
//! # Core concepts
//!
//! - **Bag**: a directory with a declaration (`bagit.txt`), payload files and
//!   manifests listing a checksum for every payload file
//! - **Complete**: every listed file exists and every payload file is listed
//! - **Valid**: complete, and every checksum matches the file contents
//! - **Payload-Oxum**: `<bytes>.<files>` in bag-info.txt, for quick checks
//!
//! # Example usage
//!
//! ```no_run
//! use bagit::{read_bag, BagVerifier};
//! use std::path::Path;
//!
//! let bag = read_bag(Path::new("/path/to/bag")).unwrap();
//!
//! let verifier = BagVerifier::new().unwrap();
//! verifier.is_valid(&bag, true).unwrap();
//! verifier.close();
//! ```

mod config;
mod error;

pub mod hash;
pub mod layout;
pub mod reader;
pub mod types;
pub mod verify;

#[cfg(test)]
mod testkit;

pub use config::Config;
pub use error::{Error, IoResultExt, OxumQuantity, Result};
pub use hash::{hash_file, Algorithm, AlgorithmMapping, StandardAlgorithmMapping};
pub use layout::BagLayout;
pub use reader::{read_bag, BagReader};
pub use types::{Bag, Encoding, FetchItem, Manifest, ManifestKind, Metadata, PayloadOxum, Version};
pub use verify::{generate_payload_oxum, BagVerifier, WorkerPool};
