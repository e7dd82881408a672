//! Cache entry model and validity rules

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use shipyard_fs::checksum;

/// TTL applied to freshly fetched remote content.
pub const DEFAULT_TTL_MINUTES: u64 = 60;

/// Key prefix separating the template namespace from the config namespace.
pub const TEMPLATE_KEY_PREFIX: &str = "template:";

/// One cached fetch result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Raw reference string (or synthetic key such as `template:<url>`)
    pub source_key: String,

    /// Checksum of `content` in `sha256:<hex>` form
    pub content_hash: String,

    /// When the content was fetched
    pub last_fetched: DateTime<Utc>,

    /// Validity window in minutes; `0` never expires
    pub ttl_minutes: u64,

    /// Fetched payload
    pub content: String,
}

impl CacheEntry {
    /// Build an entry fetched now.
    pub fn new(key: impl Into<String>, content: impl Into<String>, ttl_minutes: u64) -> Self {
        Self::fetched_at(key, content, ttl_minutes, Utc::now())
    }

    /// Build an entry with an explicit fetch time.
    pub fn fetched_at(
        key: impl Into<String>,
        content: impl Into<String>,
        ttl_minutes: u64,
        last_fetched: DateTime<Utc>,
    ) -> Self {
        let content = content.into();
        Self {
            source_key: key.into(),
            content_hash: checksum::compute_content_checksum(&content),
            last_fetched,
            ttl_minutes,
            content,
        }
    }

    /// Cache key used for a changelog template reference.
    pub fn template_key(reference: &str) -> String {
        format!("{TEMPLATE_KEY_PREFIX}{reference}")
    }

    /// Whether this entry belongs to the template namespace.
    pub fn is_template(&self) -> bool {
        self.source_key.starts_with(TEMPLATE_KEY_PREFIX)
    }

    /// Instant after which the entry is no longer valid, if it ever expires.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        if self.ttl_minutes == 0 {
            return None;
        }
        let minutes = i64::try_from(self.ttl_minutes).unwrap_or(i64::MAX);
        Some(
            Duration::try_minutes(minutes)
                .and_then(|ttl| self.last_fetched.checked_add_signed(ttl))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        )
    }

    /// Valid iff `ttl == 0` or `now < last_fetched + ttl`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at() {
            None => true,
            Some(expiry) => now < expiry,
        }
    }

    /// Validity against the current clock.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}

/// Outcome of a cache lookup.
///
/// Neither `Miss` nor `Expired` is an error: an unusable cache is the
/// normal state before the first fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    /// A valid entry
    Hit(CacheEntry),
    /// No usable entry exists
    Miss,
    /// An entry exists but its TTL has elapsed
    Expired(CacheEntry),
}

impl CacheLookup {
    /// The entry, only if it is still valid.
    pub fn into_hit(self) -> Option<CacheEntry> {
        match self {
            Self::Hit(entry) => Some(entry),
            Self::Miss | Self::Expired(_) => None,
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }
}
