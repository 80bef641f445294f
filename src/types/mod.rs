mod bag;
mod encoding;
mod metadata;
mod version;

pub use bag::{Bag, FetchItem, Manifest, ManifestKind};
pub use encoding::Encoding;
pub use metadata::{Metadata, PayloadOxum, PAYLOAD_OXUM};
pub use version::Version;
