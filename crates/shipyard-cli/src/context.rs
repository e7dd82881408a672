//! Per-invocation context shared by commands

use std::path::PathBuf;

use shipyard_core::{CacheStore, ConfigLoader, Resolver, Settings};

use crate::error::Result;

/// Effective settings after applying command-line overrides.
#[derive(Debug, Clone)]
pub struct Context {
    pub settings: Settings,
}

impl Context {
    /// Load settings and apply the global flags on top.
    pub fn load(cache_dir: Option<PathBuf>) -> Result<Self> {
        let mut settings = Settings::load()?;
        if let Some(dir) = cache_dir {
            settings.cache_dir = dir;
        }
        tracing::debug!(
            cache_dir = %settings.cache_dir.display(),
            ttl_minutes = settings.ttl_minutes,
            "Effective settings"
        );
        Ok(Self { settings })
    }

    pub fn loader(&self) -> Result<ConfigLoader> {
        Ok(ConfigLoader::new(Resolver::from_settings(&self.settings)?))
    }

    pub fn cache(&self) -> CacheStore {
        CacheStore::new(&self.settings.cache_dir)
    }
}
