//! Local cache for fetched remote configuration and templates
//!
//! Each entry lives in its own JSON file under the cache root. File names
//! are derived from a SHA-256 of the entry key, so the same raw reference
//! always maps to the same file.
//!
//! Reads never fail: a missing, unreadable or corrupted file is a miss.
//! Writes go through [`shipyard_fs::io::write_atomic`], so a failed write
//! leaves the previous entry intact.

pub mod entry;
pub mod error;
pub mod store;

pub use entry::{CacheEntry, CacheLookup, DEFAULT_TTL_MINUTES, TEMPLATE_KEY_PREFIX};
pub use error::{Error, Result};
pub use store::CacheStore;

/// Get the default cache directory.
///
/// Uses the OS user cache directory, or `.shipyard/cache` relative to the
/// working directory when the platform has none.
pub fn default_cache_dir() -> std::path::PathBuf {
    match dirs::cache_dir() {
        Some(dir) => dir.join("shipyard").join("remote"),
        None => std::path::PathBuf::from(".shipyard").join("cache"),
    }
}
