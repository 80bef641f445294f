use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const PAYLOAD_OXUM: &str = "Payload-Oxum";

/// ordered bag-info key/value pairs
///
/// keys may repeat. lookups are case-insensitive, insertion order is kept.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// add a pair; a new Payload-Oxum replaces any existing one
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        if key.eq_ignore_ascii_case(PAYLOAD_OXUM) {
            self.remove(PAYLOAD_OXUM);
        }
        self.entries.push((key, value.into()));
    }

    pub fn add_all(&mut self, pairs: impl IntoIterator<Item = (String, String)>) {
        for (key, value) in pairs {
            self.add(key, value);
        }
    }

    /// all values recorded under a key, in file order
    pub fn get(&self, key: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// first value recorded under a key
    pub fn first(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k.eq_ignore_ascii_case(key))
    }

    pub fn remove(&mut self, key: &str) {
        self.entries.retain(|(k, _)| !k.eq_ignore_ascii_case(key));
    }

    pub fn all(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// parsed Payload-Oxum, if present and well formed
    pub fn payload_oxum(&self) -> Option<PayloadOxum> {
        self.entries
            .iter()
            .find(|(k, _)| k == PAYLOAD_OXUM)
            .and_then(|(_, v)| v.parse().ok())
    }
}

/// `<total bytes>.<file count>` summary of a payload
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadOxum {
    pub total_bytes: u64,
    pub file_count: u64,
}

impl PayloadOxum {
    pub fn new(total_bytes: u64, file_count: u64) -> Self {
        Self {
            total_bytes,
            file_count,
        }
    }
}

impl FromStr for PayloadOxum {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (bytes, count) = s.trim().split_once('.').ok_or(())?;
        let digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
        if !digits(bytes) || !digits(count) {
            return Err(());
        }
        Ok(Self {
            total_bytes: bytes.parse().map_err(|_| ())?,
            file_count: count.parse().map_err(|_| ())?,
        })
    }
}

impl fmt::Display for PayloadOxum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.total_bytes, self.file_count)
    }
}
