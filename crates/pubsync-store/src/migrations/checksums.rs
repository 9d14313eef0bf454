//! Checksums of migration SQL
//!
//! A migration whose text changes after it was applied is a tampering or
//! merge accident; the runner refuses to continue.

use sha2::{Digest, Sha256};

/// SHA-256 of the migration text, hex encoded
pub fn compute_checksum(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}
