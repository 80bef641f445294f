use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use md5::Md5;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha512};

use crate::error::{Error, IoResultExt, Result};

/// read chunk size used while hashing files
const CHUNK_SIZE: usize = 64 * 1024;

/// checksum algorithms a manifest may be written with
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha512,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Md5,
        Algorithm::Sha1,
        Algorithm::Sha224,
        Algorithm::Sha256,
        Algorithm::Sha512,
    ];

    /// name used in manifest file names (`manifest-<name>.txt`)
    pub fn bagit_name(&self) -> &'static str {
        match self {
            Algorithm::Md5 => "md5",
            Algorithm::Sha1 => "sha1",
            Algorithm::Sha224 => "sha224",
            Algorithm::Sha256 => "sha256",
            Algorithm::Sha512 => "sha512",
        }
    }

    /// length of the hex digest this algorithm produces
    pub fn hex_len(&self) -> usize {
        match self {
            Algorithm::Md5 => 32,
            Algorithm::Sha1 => 40,
            Algorithm::Sha224 => 56,
            Algorithm::Sha256 => 64,
            Algorithm::Sha512 => 128,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.bagit_name())
    }
}

/// maps the algorithm token of a manifest file name to a supported algorithm
///
/// implement this to accept non-standard manifest names such as `manifest-sha-256.txt`.
pub trait AlgorithmMapping: Send + Sync {
    fn algorithm(&self, bagit_name: &str) -> Result<Algorithm>;
}

/// the standard BagIt algorithm names, matched case-insensitively
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardAlgorithmMapping;

impl AlgorithmMapping for StandardAlgorithmMapping {
    fn algorithm(&self, bagit_name: &str) -> Result<Algorithm> {
        Algorithm::ALL
            .into_iter()
            .find(|alg| alg.bagit_name().eq_ignore_ascii_case(bagit_name))
            .ok_or_else(|| Error::UnsupportedAlgorithm(bagit_name.to_string()))
    }
}

/// hash a file with the given algorithm, returning lowercase hex
pub fn hash_file(path: &Path, algorithm: Algorithm) -> Result<String> {
    let file = File::open(path).with_path(path)?;
    let reader = BufReader::new(file);

    match algorithm {
        Algorithm::Md5 => digest_reader::<Md5, _>(reader, path),
        Algorithm::Sha1 => digest_reader::<Sha1, _>(reader, path),
        Algorithm::Sha224 => digest_reader::<Sha224, _>(reader, path),
        Algorithm::Sha256 => digest_reader::<Sha256, _>(reader, path),
        Algorithm::Sha512 => digest_reader::<Sha512, _>(reader, path),
    }
}

/// hash an in-memory buffer, returning lowercase hex
pub fn hash_bytes(data: &[u8], algorithm: Algorithm) -> String {
    match algorithm {
        Algorithm::Md5 => hex::encode(Md5::digest(data)),
        Algorithm::Sha1 => hex::encode(Sha1::digest(data)),
        Algorithm::Sha224 => hex::encode(Sha224::digest(data)),
        Algorithm::Sha256 => hex::encode(Sha256::digest(data)),
        Algorithm::Sha512 => hex::encode(Sha512::digest(data)),
    }
}

fn digest_reader<D: Digest, R: Read>(mut reader: R, path: &Path) -> Result<String> {
    let mut hasher = D::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = reader.read(&mut buf).with_path(path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}
