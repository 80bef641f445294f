//! fetch.txt, the list of payload files still to be downloaded

use std::path::Path;

use url::Url;

use crate::error::{Error, Result};
use crate::reader::path::resolve;
use crate::reader::split_fields;
use crate::types::{Encoding, FetchItem};

/// read fetch.txt
///
/// each non-blank line is `<url> <length|-> <path>`; the path may contain spaces.
pub fn read_fetch(fetch_file: &Path, encoding: Encoding, bag_root: &Path) -> Result<Vec<FetchItem>> {
    tracing::info!("reading fetch file {}", fetch_file.display());
    let text = encoding.read_to_string(fetch_file)?;
    parse_fetch(&text, bag_root)
}

pub fn parse_fetch(text: &str, bag_root: &Path) -> Result<Vec<FetchItem>> {
    let mut items = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let item = parse_fetch_line(line, bag_root)?;
        tracing::debug!("read fetch item {}", item);
        items.push(item);
    }

    Ok(items)
}

fn parse_fetch_line(line: &str, bag_root: &Path) -> Result<FetchItem> {
    let invalid = |why: &str| {
        Error::InvalidFormat(format!(
            "fetch line [{}] is not of the form <url> <length|-> <path>: {}",
            line, why
        ))
    };

    let fields = split_fields(line, 3);
    let [url, length, raw_path] = fields.as_slice() else {
        return Err(invalid("expected three fields"));
    };

    let length = match *length {
        "-" => None,
        digits => Some(digits.parse::<u64>().map_err(|_| invalid("bad length"))?),
    };

    // destination is checked before the url
    let path = resolve(bag_root, raw_path)?;
    let url = Url::parse(url).map_err(|e| invalid(&e.to_string()))?;

    Ok(FetchItem::new(url, length, path))
}
