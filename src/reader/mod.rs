//! parsing of bag tag files

mod bag;
pub mod declaration;
pub mod fetch;
pub mod key_value;
pub mod manifest;
pub mod metadata;
pub mod path;

pub use bag::{read_bag, BagReader};
pub use declaration::{read_declaration, Declaration};
pub use fetch::read_fetch;
pub use key_value::read_key_values;
pub use manifest::{read_all_manifests, read_manifest, Manifests};
pub use metadata::read_bag_metadata;
pub use path::resolve;

/// split a line into at most `n` whitespace separated fields
///
/// the last field keeps any inner whitespace, so paths with spaces survive.
pub(crate) fn split_fields(line: &str, n: usize) -> Vec<&str> {
    let mut fields = Vec::with_capacity(n);
    let mut rest = line.trim_start();

    while fields.len() + 1 < n {
        match rest.find(char::is_whitespace) {
            Some(idx) => {
                fields.push(&rest[..idx]);
                rest = rest[idx..].trim_start();
            }
            None => break,
        }
    }
    if !rest.is_empty() {
        fields.push(rest);
    }
    fields
}
