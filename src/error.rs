use std::path::{Path, PathBuf};

/// error type for bag reading and verification
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("path [{0}] resolves outside the bag root and is considered malicious")]
    MaliciousPath(String),

    #[error("invalid bagit file format: {0}")]
    InvalidFormat(String),

    #[error("line [{line}] does not match the expected form <key>{separator}<value>")]
    InvalidMetadata { line: String, separator: String },

    #[error("unparsable bagit version [{0}], expected <major>.<minor>")]
    UnparsableVersion(String),

    #[error("unsupported checksum algorithm [{0}]")]
    UnsupportedAlgorithm(String),

    #[error("unsupported tag file character encoding [{0}]")]
    UnsupportedEncoding(String),

    #[error("bag declaration file {0} does not exist")]
    MissingBagitFile(PathBuf),

    #[error("payload directory {0} does not exist")]
    MissingPayloadDirectory(PathBuf),

    #[error("no payload manifest (manifest-<algorithm>.txt) found in {0}")]
    MissingPayloadManifest(PathBuf),

    #[error("fetch item [{url}] has not been fetched to {}", .path.display())]
    MissingFetchTarget { url: String, path: PathBuf },

    #[error("{} is in the payload directory but is not listed in {}", .path.display(), manifest_label(.algorithm.as_deref()))]
    FileNotInManifest {
        path: PathBuf,
        algorithm: Option<String>,
    },

    #[error("manifest(s) list file(s) that do not exist: {}", display_paths(.0))]
    FileNotInPayloadDirectory(Vec<PathBuf>),

    #[error("checksum mismatch for {} using {algorithm}: expected [{expected}] but computed [{actual}]", .path.display())]
    CorruptChecksum {
        path: PathBuf,
        algorithm: String,
        expected: String,
        actual: String,
    },

    #[error("verification failed: {0}")]
    Verification(#[source] Box<Error>),

    #[error("payload-oxum {quantity} mismatch: declared {expected} but found {actual}")]
    InvalidPayloadOxum {
        quantity: OxumQuantity,
        expected: u64,
        actual: u64,
    },

    #[error("payload-oxum is missing or malformed in the bag metadata")]
    PayloadOxumMissing,

    #[error("worker pool has been shut down")]
    PoolClosed,

    #[error("failed to start worker thread: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    #[error("checksum task for {} panicked", .0.display())]
    TaskPanicked(PathBuf),

    #[error("{missing} of {submitted} checksum tasks never reported a result")]
    TasksLost { missing: usize, submitted: usize },

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

/// which half of a payload-oxum disagreed with the payload on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OxumQuantity {
    TotalBytes,
    FileCount,
}

impl std::fmt::Display for OxumQuantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OxumQuantity::TotalBytes => write!(f, "total size"),
            OxumQuantity::FileCount => write!(f, "file count"),
        }
    }
}

fn manifest_label(algorithm: Option<&str>) -> String {
    match algorithm {
        Some(alg) => format!("the {} manifest", alg),
        None => "any manifest".to_string(),
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, Error>;

/// helper to wrap io errors with path context
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.into(),
            source,
        })
    }
}

/// convert a walkdir failure into an io error anchored at the walk root
pub(crate) fn walk_error(root: &Path, err: walkdir::Error) -> Error {
    let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
    Error::Io {
        path,
        source: err
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "walkdir error")),
    }
}
