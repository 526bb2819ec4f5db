//! SHA-256 fingerprint of change-set content.

use sha2::{Digest, Sha256};

/// Compute the lowercase hex SHA-256 digest of `content`.
///
/// Stored in the ledger as audit metadata when a change-set is applied.
pub fn compute_checksum(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    format!("{:x}", digest)
}
