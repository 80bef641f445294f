use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// bagit format version (major.minor)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    /// first version with the strict two-line declaration
    pub const V1_0: Version = Version::new(1, 0);
    /// first version keeping tag files in a `.bagit` directory
    pub const V2_0: Version = Version::new(2, 0);

    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    pub fn is_older(&self, other: Version) -> bool {
        *self < other
    }

    pub fn is_same_or_newer(&self, other: Version) -> bool {
        *self >= other
    }

    pub fn is_newer(&self, other: Version) -> bool {
        *self > other
    }

    pub fn is_same_or_older(&self, other: Version) -> bool {
        *self <= other
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for Version {
    type Err = Error;

    /// parse `<digits>.<digits>`, surrounding whitespace allowed
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unparsable = || Error::UnparsableVersion(s.to_string());

        let (major, minor) = s.trim().split_once('.').ok_or_else(unparsable)?;
        if !is_digits(major) || !is_digits(minor) {
            return Err(unparsable());
        }

        Ok(Version::new(
            major.parse().map_err(|_| unparsable())?,
            minor.parse().map_err(|_| unparsable())?,
        ))
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
