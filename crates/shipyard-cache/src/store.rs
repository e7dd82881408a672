//! On-disk cache store

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use shipyard_fs::{checksum, io};

use crate::entry::{CacheEntry, CacheLookup};
use crate::{Error, Result};

/// Extension of cache entry files
const ENTRY_EXTENSION: &str = "json";

/// TTL cache keyed by raw reference strings.
///
/// Not safe against concurrent writers from separate processes beyond what
/// the per-file write lock provides: the last writer wins.
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    /// Create a store rooted at `root`. The directory is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The cache root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File that holds the entry for `key`.
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", checksum::sha256_hex(key), ENTRY_EXTENSION))
    }

    /// Look up `key`.
    ///
    /// Missing, unreadable and corrupted entries are all reported as
    /// [`CacheLookup::Miss`]; the caller can always fall back to a fetch.
    pub fn get(&self, key: &str) -> CacheLookup {
        let path = self.entry_path(key);
        let Some(entry) = read_entry(&path) else {
            return CacheLookup::Miss;
        };

        if entry.source_key != key {
            tracing::warn!(
                path = %path.display(),
                expected = %key,
                found = %entry.source_key,
                "Cache entry belongs to a different key, ignoring"
            );
            return CacheLookup::Miss;
        }

        if entry.is_valid_at(Utc::now()) {
            CacheLookup::Hit(entry)
        } else {
            CacheLookup::Expired(entry)
        }
    }

    /// Store `content` for `key`, replacing any existing entry.
    pub fn put(&self, key: &str, content: &str, ttl_minutes: u64) -> Result<CacheEntry> {
        let entry = CacheEntry::new(key, content, ttl_minutes);
        self.put_entry(&entry)?;
        Ok(entry)
    }

    /// Store a pre-built entry under its `source_key`.
    pub fn put_entry(&self, entry: &CacheEntry) -> Result<()> {
        let path = self.entry_path(&entry.source_key);
        let body = serde_json::to_vec_pretty(entry).map_err(|source| Error::Encode {
            key: entry.source_key.clone(),
            source,
        })?;

        io::write_atomic(&path, &body)?;
        tracing::debug!(
            key = %entry.source_key,
            path = %path.display(),
            ttl_minutes = entry.ttl_minutes,
            "Wrote cache entry"
        );
        Ok(())
    }

    /// Remove the entry for `key`. Returns whether one existed.
    pub fn remove(&self, key: &str) -> Result<bool> {
        Ok(io::remove_file(&self.entry_path(key))?)
    }

    /// All readable entries, newest first.
    ///
    /// Corrupted files are skipped rather than reported.
    pub fn list(&self) -> Result<Vec<CacheEntry>> {
        let mut entries: Vec<CacheEntry> = self
            .entry_files()?
            .iter()
            .filter_map(|path| read_entry(path))
            .collect();

        entries.sort_by(|a, b| b.last_fetched.cmp(&a.last_fetched));
        Ok(entries)
    }

    /// Delete every entry file. Returns how many were removed.
    pub fn clear(&self) -> Result<usize> {
        let mut removed = 0;
        for path in self.entry_files()? {
            if io::remove_file(&path)? {
                removed += 1;
            }
        }
        tracing::debug!(root = %self.root.display(), removed, "Cleared cache");
        Ok(removed)
    }

    fn entry_files(&self) -> Result<Vec<PathBuf>> {
        let read_dir = match fs::read_dir(&self.root) {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(Error::ReadDir {
                    path: self.root.clone(),
                    source,
                });
            }
        };

        let files = read_dir
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path.extension().and_then(|e| e.to_str()) == Some(ENTRY_EXTENSION)
            })
            .collect();
        Ok(files)
    }
}

fn read_entry(path: &Path) -> Option<CacheEntry> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Unreadable cache entry");
            return None;
        }
    };

    match serde_json::from_slice(&raw) {
        Ok(entry) => Some(entry),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Corrupted cache entry");
            None
        }
    }
}
