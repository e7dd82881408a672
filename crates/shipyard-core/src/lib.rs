//! Remote configuration resolution for shipyard
//!
//! A shipyard project may extend a shared base configuration hosted
//! elsewhere. This crate classifies the reference, fetches it over HTTP or
//! git, caches it with a TTL and overlays the local project on top.
//!
//! # Architecture
//!
//! ```text
//!               shipyard-cli
//!                    |
//!              shipyard-core
//!     reference -> resolver -> merge -> loader
//!                    |
//!     +--------------+--------------+
//!     |              |              |
//! shipyard-fs  shipyard-cache  shipyard-git
//! ```
//!
//! # Example
//!
//! ```ignore
//! use shipyard_core::{ConfigLoader, Resolver, Settings};
//!
//! let resolver = Resolver::from_settings(&Settings::load()?)?;
//! let loader = ConfigLoader::new(resolver);
//! let config = loader.load_remote_config("github:acme/shared/shipyard.yaml", false)?;
//! println!("{:?}", config.project.repo_type);
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod loader;
pub mod merge;
pub mod reference;
pub mod resolver;
pub mod settings;
pub mod transport;

pub use config::{MergedConfig, ProjectConfig, ResolvedConfig};
pub use error::{AttemptFailure, Error, Result};
pub use events::{NoopObserver, ResolveEvent, ResolveObserver, TracingObserver};
pub use loader::ConfigLoader;
pub use merge::{merge_with_base, overlay, validate_base};
pub use reference::{
    ClassifyError, DEFAULT_REF, Location, RemoteReference, SUPPORTED_FORMS, Scheme, classify,
    is_remote,
};
pub use resolver::{Fetched, Origin, Resolver};
pub use settings::Settings;
pub use transport::{GitTransport, HttpTransport, TransportError};

// Re-exported for cache administration by callers
pub use shipyard_cache::{CacheEntry, CacheLookup, CacheStore};
