//! SHA-256 checksum utilities
//!
//! Provides a single canonical checksum format (`sha256:<hex>`) used for
//! cached payloads and for deriving cache file names.

use sha2::{Digest, Sha256};

/// Algorithm tag carried by every checksum string
const PREFIX: &str = "sha256:";

/// Number of hex characters shown by [`short_hash`]
const SHORT_LEN: usize = 12;

/// Compute the bare SHA-256 hex digest of some bytes.
pub fn sha256_hex(content: impl AsRef<[u8]>) -> String {
    let digest = Sha256::digest(content.as_ref());
    digest.iter().map(|byte| format!("{byte:02x}")).collect()
}

/// Tagged checksum of a payload, e.g. `sha256:b94d…`.
pub fn compute_content_checksum(content: impl AsRef<[u8]>) -> String {
    format!("{}{}", PREFIX, sha256_hex(content))
}

/// Shorten a checksum for display, dropping the `sha256:` prefix.
pub fn short_hash(checksum: &str) -> &str {
    let hex = checksum.strip_prefix(PREFIX).unwrap_or(checksum);
    match hex.char_indices().nth(SHORT_LEN) {
        Some((idx, _)) => &hex[..idx],
        None => hex,
    }
}
