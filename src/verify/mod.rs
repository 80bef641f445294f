//! completeness, validity and quick verification of bags

pub mod checksum;
pub mod mandatory;
pub mod pool;
pub mod quick;
pub mod tree;
mod verifier;
pub mod walk;

pub use checksum::{check_manifest, verify_manifest};
pub use pool::WorkerPool;
pub use quick::{can_quick_verify, generate_payload_oxum, payload_totals, quickly_verify};
pub use verifier::BagVerifier;
pub use walk::TreeWalk;
