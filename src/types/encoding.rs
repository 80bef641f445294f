use std::fmt;
use std::path::Path;

use crate::error::{Error, IoResultExt, Result};

/// character encoding declared for tag files in bagit.txt
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    UsAscii,
    Latin1,
}

impl Encoding {
    /// look up an encoding by its declared label
    pub fn from_label(label: &str) -> Result<Self> {
        let normalized = label.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "us-ascii" | "ascii" | "iso646-us" => Ok(Encoding::UsAscii),
            "iso-8859-1" | "iso8859-1" | "iso_8859-1" | "latin1" | "l1" => Ok(Encoding::Latin1),
            _ => Err(Error::UnsupportedEncoding(label.to_string())),
        }
    }

    /// canonical label
    pub fn label(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::UsAscii => "US-ASCII",
            Encoding::Latin1 => "ISO-8859-1",
        }
    }

    /// decode raw file bytes
    pub fn decode(&self, bytes: Vec<u8>, path: &Path) -> Result<String> {
        match self {
            Encoding::Utf8 => String::from_utf8(bytes).map_err(|_| {
                Error::InvalidFormat(format!("{} is not valid UTF-8", path.display()))
            }),
            Encoding::UsAscii => {
                if !bytes.is_ascii() {
                    return Err(Error::InvalidFormat(format!(
                        "{} contains non US-ASCII bytes",
                        path.display()
                    )));
                }
                // ascii is a subset of utf-8
                String::from_utf8(bytes).map_err(|_| {
                    Error::InvalidFormat(format!("{} is not valid US-ASCII", path.display()))
                })
            }
            // every latin-1 byte is the code point of the same value
            Encoding::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
        }
    }

    /// read and decode a whole tag file
    pub fn read_to_string(&self, path: &Path) -> Result<String> {
        let bytes = std::fs::read(path).with_path(path)?;
        self.decode(bytes, path)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
