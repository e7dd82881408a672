//! Resolution diagnostics
//!
//! The resolver does not log on its own. It reports what it does to a
//! [`ResolveObserver`], and the caller decides where those events go.
//! [`TracingObserver`] forwards them to `tracing` and is the default.

use chrono::{DateTime, Utc};

/// Something the resolver did or observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveEvent {
    /// A valid cache entry was used
    CacheHit {
        key: String,
        fetched_at: DateTime<Utc>,
    },
    /// No cache entry existed
    CacheMiss { key: String },
    /// A cache entry existed but its TTL had elapsed
    CacheExpired {
        key: String,
        fetched_at: DateTime<Utc>,
    },
    /// The caller forced a fresh fetch
    CacheBypassed { key: String },
    /// About to call a transport
    FetchAttempt {
        endpoint: String,
        attempt: usize,
        of: usize,
    },
    /// A transport call failed
    FetchFailed { endpoint: String, error: String },
    /// A transport call succeeded
    Fetched { endpoint: String, bytes: usize },
    /// Fetched content could not be written to the cache
    CacheWriteFailed { key: String, error: String },
}

/// Receives resolver diagnostics.
pub trait ResolveObserver {
    fn on_event(&self, event: &ResolveEvent);
}

impl<F> ResolveObserver for F
where
    F: Fn(&ResolveEvent),
{
    fn on_event(&self, event: &ResolveEvent) {
        self(event)
    }
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ResolveObserver for TracingObserver {
    fn on_event(&self, event: &ResolveEvent) {
        match event {
            ResolveEvent::CacheHit { key, fetched_at } => {
                tracing::debug!(%key, %fetched_at, "Using cached remote config")
            }
            ResolveEvent::CacheMiss { key } => tracing::debug!(%key, "Cache miss"),
            ResolveEvent::CacheExpired { key, fetched_at } => {
                tracing::debug!(%key, %fetched_at, "Cache entry expired")
            }
            ResolveEvent::CacheBypassed { key } => {
                tracing::debug!(%key, "Cache bypassed, forcing fresh fetch")
            }
            ResolveEvent::FetchAttempt {
                endpoint,
                attempt,
                of,
            } => tracing::debug!(%endpoint, attempt, of, "Fetching remote config"),
            ResolveEvent::FetchFailed { endpoint, error } => {
                tracing::warn!(%endpoint, %error, "Fetch attempt failed")
            }
            ResolveEvent::Fetched { endpoint, bytes } => {
                tracing::debug!(%endpoint, bytes, "Fetched remote config")
            }
            ResolveEvent::CacheWriteFailed { key, error } => {
                tracing::warn!(%key, %error, "Failed to cache remote config")
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ResolveObserver for NoopObserver {
    fn on_event(&self, _event: &ResolveEvent) {}
}
