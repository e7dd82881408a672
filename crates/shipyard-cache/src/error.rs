//! Error types for shipyard-cache

use std::path::PathBuf;

/// Result type for cache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by cache writes and administrative operations.
///
/// Lookups never produce these; see [`crate::CacheStore::get`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fs(#[from] shipyard_fs::Error),

    #[error("Failed to encode cache entry for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read cache directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
