//! bagit.txt, the bag declaration

use std::path::Path;

use crate::error::{Error, IoResultExt, Result};
use crate::layout::BagLayout;
use crate::reader::key_value::parse_key_values;
use crate::types::{Encoding, Version};

const BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const VERSION_KEY: &str = "BagIt-Version";
const ENCODING_KEY: &str = "Tag-File-Character-Encoding";

/// contents of bagit.txt
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub version: Version,
    pub encoding: Encoding,
    /// raw lines, kept for linters that care about formatting
    pub lines: Vec<String>,
}

/// read bagit.txt
///
/// the declaration is always utf-8, whatever encoding it declares for the
/// other tag files.
pub fn read_declaration(path: &Path) -> Result<Declaration> {
    tracing::debug!("reading version and encoding from {}", path.display());

    let bytes = std::fs::read(path).with_path(path)?;
    if bytes.starts_with(BOM) {
        return Err(Error::InvalidFormat(format!(
            "{} starts with a byte order mark, which is not allowed",
            path.display()
        )));
    }
    let text = Encoding::Utf8.decode(bytes, path)?;

    parse_declaration(&text)
}

/// parse the text of bagit.txt
pub fn parse_declaration(text: &str) -> Result<Declaration> {
    let mut version = None;
    let mut encoding = None;

    for (key, value) in parse_key_values(text, ":")? {
        match key.as_str() {
            VERSION_KEY => {
                tracing::debug!("bagit version is [{}]", value);
                version = Some(value);
            }
            ENCODING_KEY => {
                tracing::debug!("tag file encoding is [{}]", value);
                encoding = Some(value);
            }
            _ => {}
        }
    }

    let (version, encoding) = match (version, encoding) {
        (Some(v), Some(e)) => (v, e),
        _ => {
            return Err(Error::InvalidFormat(format!(
                "bagit.txt must contain both {} and {}",
                VERSION_KEY, ENCODING_KEY
            )))
        }
    };

    let encoding = Encoding::from_label(&encoding)?;
    let version: Version = version.parse()?;
    let lines: Vec<String> = text.lines().map(str::to_string).collect();

    if BagLayout::declaration_is_strict(version) {
        check_strict_lines(&lines)?;
    }

    Ok(Declaration {
        version,
        encoding,
        lines,
    })
}

/// from 1.0 on the declaration is exactly
/// `BagIt-Version: M.N` followed by `Tag-File-Character-Encoding: ENCODING`
fn check_strict_lines(lines: &[String]) -> Result<()> {
    if lines.len() > 2 {
        return Err(Error::InvalidFormat(format!(
            "bagit.txt may only contain two lines, found extra lines {:?}",
            &lines[2..]
        )));
    }

    let first = lines.first().map(String::as_str).unwrap_or("");
    let version_ok = first
        .strip_prefix("BagIt-Version: ")
        .and_then(|v| v.split_once('.'))
        .is_some_and(|(major, minor)| {
            major.bytes().all(|b| b.is_ascii_digit()) && minor.bytes().all(|b| b.is_ascii_digit())
        });
    if !version_ok {
        return Err(Error::InvalidFormat(format!(
            "first line of bagit.txt must be exactly 'BagIt-Version: <M.N>', found [{}]",
            first
        )));
    }

    let second = lines.get(1).map(String::as_str).unwrap_or("");
    let encoding_ok = second
        .strip_prefix("Tag-File-Character-Encoding: ")
        .is_some_and(|e| !e.chars().any(char::is_whitespace));
    if !encoding_ok {
        return Err(Error::InvalidFormat(format!(
            "second line of bagit.txt must be exactly 'Tag-File-Character-Encoding: <ENCODING>', found [{}]",
            second
        )));
    }

    Ok(())
}
