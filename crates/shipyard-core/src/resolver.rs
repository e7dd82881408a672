//! Remote reference resolution
//!
//! The [`Resolver`] ties the engine together: it classifies a reference,
//! serves it from the cache when a valid entry exists, otherwise walks the
//! candidate endpoints in order until one transport call succeeds, caches
//! the result and parses it.
//!
//! Everything runs on the calling thread. Candidates are tried strictly in
//! sequence and the first success wins.

use chrono::{DateTime, Utc};
use shipyard_cache::{CacheEntry, CacheLookup, CacheStore, DEFAULT_TTL_MINUTES};
use shipyard_fs::{Format, parse_document};

use crate::config::ResolvedConfig;
use crate::error::AttemptFailure;
use crate::events::{ResolveEvent, ResolveObserver, TracingObserver};
use crate::reference::{ClassifyError, Location, RemoteReference};
use crate::settings::Settings;
use crate::transport::{
    DEFAULT_TIMEOUT, Git2Transport, GitTransport, HttpTransport, ReqwestTransport, TransportError,
};
use crate::{Error, Result};

/// Where fetched content came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// A valid cache entry
    Cache { fetched_at: DateTime<Utc> },
    /// The endpoint that answered
    Network { endpoint: String },
}

impl Origin {
    pub fn is_cache(&self) -> bool {
        matches!(self, Self::Cache { .. })
    }
}

/// Raw content for a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub reference: RemoteReference,
    pub content: String,
    pub origin: Origin,
}

impl Fetched {
    /// Detect the format of the content and parse it.
    ///
    /// The detection hint is the URL or in-repository path, never the raw
    /// reference, so an `@ref` suffix does not hide the extension.
    pub fn parse(&self) -> Result<ResolvedConfig> {
        let reference = &self.reference;
        let format = Format::detect(reference.source_hint(), &self.content);
        tracing::trace!(reference = %reference, %format, "Parsing remote config");

        let document = parse_document(format, &self.content, reference.raw()).map_err(
            |source| Error::Parse {
                reference: reference.raw().to_string(),
                source,
            },
        )?;
        Ok(ResolvedConfig::from(document))
    }
}

/// Cache-aware fetcher for remote references.
pub struct Resolver {
    cache: CacheStore,
    http: Box<dyn HttpTransport>,
    git: Box<dyn GitTransport>,
    observer: Box<dyn ResolveObserver>,
    ttl_minutes: u64,
}

impl Resolver {
    /// Resolver with the reqwest and libgit2 transports.
    pub fn new(cache: CacheStore) -> Result<Self> {
        Ok(Self::with_transports(
            cache,
            ReqwestTransport::new(DEFAULT_TIMEOUT)?,
            Git2Transport::new(),
        ))
    }

    /// Resolver with explicit transports.
    pub fn with_transports(
        cache: CacheStore,
        http: impl HttpTransport + 'static,
        git: impl GitTransport + 'static,
    ) -> Self {
        Self {
            cache,
            http: Box::new(http),
            git: Box::new(git),
            observer: Box::new(TracingObserver),
            ttl_minutes: DEFAULT_TTL_MINUTES,
        }
    }

    /// Resolver configured from engine settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let resolver = Self::with_transports(
            CacheStore::new(&settings.cache_dir),
            ReqwestTransport::new(settings.http_timeout)?,
            Git2Transport::new(),
        );
        Ok(resolver.with_ttl_minutes(settings.ttl_minutes))
    }

    pub fn with_http(mut self, http: impl HttpTransport + 'static) -> Self {
        self.http = Box::new(http);
        self
    }

    pub fn with_git(mut self, git: impl GitTransport + 'static) -> Self {
        self.git = Box::new(git);
        self
    }

    /// Send diagnostics to `observer` instead of `tracing`.
    pub fn with_observer(mut self, observer: impl ResolveObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// TTL for entries written by this resolver; `0` never expires.
    pub fn with_ttl_minutes(mut self, ttl_minutes: u64) -> Self {
        self.ttl_minutes = ttl_minutes;
        self
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn ttl_minutes(&self) -> u64 {
        self.ttl_minutes
    }

    /// Fetch the raw content of a remote configuration.
    ///
    /// The cache is consulted first unless `force_fresh` is set. A network
    /// fetch always refreshes the cache entry.
    pub fn fetch(&self, raw: &str, force_fresh: bool) -> Result<Fetched> {
        let reference = RemoteReference::parse(raw)?;
        let key = reference.raw().to_string();
        self.fetch_keyed(reference, &key, force_fresh)
    }

    /// Fetch, detect the format of and parse a remote configuration.
    pub fn resolve(&self, raw: &str, force_fresh: bool) -> Result<ResolvedConfig> {
        self.fetch(raw, force_fresh)?.parse()
    }

    /// Fetch a changelog template. Templates are cached apart from configs.
    pub fn fetch_template(&self, raw: &str, force_fresh: bool) -> Result<String> {
        let reference = RemoteReference::parse(raw)?;
        let key = CacheEntry::template_key(reference.raw());
        Ok(self.fetch_keyed(reference, &key, force_fresh)?.content)
    }

    fn fetch_keyed(
        &self,
        reference: RemoteReference,
        key: &str,
        force_fresh: bool,
    ) -> Result<Fetched> {
        if force_fresh {
            self.emit(ResolveEvent::CacheBypassed {
                key: key.to_string(),
            });
        } else {
            match self.cache.get(key) {
                CacheLookup::Hit(entry) => {
                    self.emit(ResolveEvent::CacheHit {
                        key: key.to_string(),
                        fetched_at: entry.last_fetched,
                    });
                    return Ok(Fetched {
                        reference,
                        content: entry.content,
                        origin: Origin::Cache {
                            fetched_at: entry.last_fetched,
                        },
                    });
                }
                CacheLookup::Expired(entry) => self.emit(ResolveEvent::CacheExpired {
                    key: key.to_string(),
                    fetched_at: entry.last_fetched,
                }),
                CacheLookup::Miss => self.emit(ResolveEvent::CacheMiss {
                    key: key.to_string(),
                }),
            }
        }

        let (endpoint, bytes) = self.fetch_network(&reference)?;
        let content = String::from_utf8(bytes).map_err(|_| Error::InvalidUtf8 {
            reference: reference.raw().to_string(),
            endpoint: endpoint.clone(),
        })?;

        if let Err(e) = self.cache.put(key, &content, self.ttl_minutes) {
            self.emit(ResolveEvent::CacheWriteFailed {
                key: key.to_string(),
                error: e.to_string(),
            });
        }

        Ok(Fetched {
            reference,
            content,
            origin: Origin::Network { endpoint },
        })
    }

    fn fetch_network(&self, reference: &RemoteReference) -> Result<(String, Vec<u8>)> {
        match reference.location() {
            Location::Http { url } => {
                self.try_endpoints(reference, std::slice::from_ref(url), |endpoint| {
                    self.http.fetch(endpoint)
                })
            }
            Location::Git(git) => self.try_endpoints(reference, git.candidates(), |endpoint| {
                self.git
                    .fetch_file(endpoint, git.file_path(), git.git_ref())
            }),
        }
    }

    /// Call `fetch` for each endpoint until one succeeds.
    ///
    /// When all fail, the last failure is the reported error and the
    /// others are attached as `earlier`.
    fn try_endpoints<F>(
        &self,
        reference: &RemoteReference,
        endpoints: &[String],
        fetch: F,
    ) -> Result<(String, Vec<u8>)>
    where
        F: Fn(&str) -> std::result::Result<Vec<u8>, TransportError>,
    {
        let total = endpoints.len();
        let mut earlier = Vec::new();
        let mut last: Option<(String, TransportError)> = None;

        for (index, endpoint) in endpoints.iter().enumerate() {
            self.emit(ResolveEvent::FetchAttempt {
                endpoint: endpoint.clone(),
                attempt: index + 1,
                of: total,
            });

            match fetch(endpoint) {
                Ok(bytes) => {
                    self.emit(ResolveEvent::Fetched {
                        endpoint: endpoint.clone(),
                        bytes: bytes.len(),
                    });
                    return Ok((endpoint.clone(), bytes));
                }
                Err(err) => {
                    self.emit(ResolveEvent::FetchFailed {
                        endpoint: endpoint.clone(),
                        error: err.to_string(),
                    });
                    if let Some((endpoint, err)) = last.replace((endpoint.clone(), err)) {
                        earlier.push(AttemptFailure {
                            endpoint,
                            message: err.to_string(),
                        });
                    }
                }
            }
        }

        match last {
            Some((endpoint, source)) => Err(Error::Transport {
                reference: reference.raw().to_string(),
                endpoint,
                source,
                earlier,
            }),
            // Classification guarantees at least one candidate
            None => Err(ClassifyError::MissingRepository {
                raw: reference.raw().to_string(),
            }
            .into()),
        }
    }

    fn emit(&self, event: ResolveEvent) {
        self.observer.on_event(&event);
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("cache", &self.cache.root())
            .field("ttl_minutes", &self.ttl_minutes)
            .finish_non_exhaustive()
    }
}
