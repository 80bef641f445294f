//! payload-oxum based quick verification

use std::path::Path;

use crate::error::{Error, OxumQuantity, Result};
use crate::types::{Bag, PayloadOxum};
use crate::verify::walk::TreeWalk;

/// a bag can be quickly verified when it declares a well-formed
/// payload-oxum and has nothing left to fetch
pub fn can_quick_verify(bag: &Bag) -> bool {
    let ok = bag.payload_oxum().is_some() && bag.items_to_fetch().is_empty();
    tracing::debug!("bag at {} quick-verifiable: {}", bag.root().display(), ok);
    ok
}

/// total bytes and file count of everything under the payload directory
///
/// hidden files count; the `.bagit` directory does not.
pub fn payload_totals(payload_dir: &Path) -> Result<PayloadOxum> {
    let mut totals = PayloadOxum::new(0, 0);
    TreeWalk::new(payload_dir).files(|_, size| {
        totals.total_bytes += size;
        totals.file_count += 1;
        Ok(())
    })?;
    Ok(totals)
}

/// render the payload-oxum value for a payload directory
pub fn generate_payload_oxum(payload_dir: &Path) -> Result<String> {
    Ok(payload_totals(payload_dir)?.to_string())
}

/// compare the declared payload-oxum against the payload on disk
///
/// size is compared before count.
pub fn quickly_verify(bag: &Bag) -> Result<()> {
    let declared = bag.payload_oxum().ok_or(Error::PayloadOxumMissing)?;
    let actual = payload_totals(&bag.layout().payload_dir())?;
    tracing::info!("payload-oxum declared {} found {}", declared, actual);

    if declared.total_bytes != actual.total_bytes {
        return Err(Error::InvalidPayloadOxum {
            quantity: OxumQuantity::TotalBytes,
            expected: declared.total_bytes,
            actual: actual.total_bytes,
        });
    }
    if declared.file_count != actual.file_count {
        return Err(Error::InvalidPayloadOxum {
            quantity: OxumQuantity::FileCount,
            expected: declared.file_count,
            actual: actual.file_count,
        });
    }
    Ok(())
}
