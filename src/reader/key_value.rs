//! the colon-separated key value format shared by bagit.txt and bag-info.txt

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::Encoding;

/// read `<key><separator><value>` pairs from a tag file
pub fn read_key_values(
    path: &Path,
    separator: &str,
    encoding: Encoding,
) -> Result<Vec<(String, String)>> {
    let text = encoding.read_to_string(path)?;
    tracing::debug!("reading key/value pairs from {}", path.display());
    parse_key_values(&text, separator)
}

/// parse key/value lines
///
/// a line starting with whitespace continues the value of the previous pair.
/// duplicate keys are kept as separate entries.
pub fn parse_key_values(text: &str, separator: &str) -> Result<Vec<(String, String)>> {
    let mut pairs: Vec<(String, String)> = Vec::new();

    for line in text.lines() {
        if line.starts_with(char::is_whitespace) {
            if let Some((key, value)) = pairs.last_mut() {
                tracing::debug!("found indented line, merging into value of [{}]", key);
                value.push('\n');
                value.push_str(line);
                continue;
            }
        }

        let (key, value) = line.split_once(separator).ok_or_else(|| Error::InvalidMetadata {
            line: line.to_string(),
            separator: separator.to_string(),
        })?;
        pairs.push((key.trim().to_string(), value.trim().to_string()));
    }

    Ok(pairs)
}
