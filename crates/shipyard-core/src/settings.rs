//! Engine settings
//!
//! Settings come from three layers, later ones overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. `<config_dir>/shipyard/settings.toml`
//! 3. `SHIPYARD_CACHE_DIR`, `SHIPYARD_CACHE_TTL` and `SHIPYARD_HTTP_TIMEOUT`
//!
//! Command-line flags are applied on top by the CLI.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use shipyard_cache::{DEFAULT_TTL_MINUTES, default_cache_dir};

use crate::transport::DEFAULT_TIMEOUT;
use crate::{Error, Result};

pub const ENV_CACHE_DIR: &str = "SHIPYARD_CACHE_DIR";
pub const ENV_CACHE_TTL: &str = "SHIPYARD_CACHE_TTL";
pub const ENV_HTTP_TIMEOUT: &str = "SHIPYARD_HTTP_TIMEOUT";

const SETTINGS_FILE: &str = "settings.toml";

/// Effective engine settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Root of the remote config cache
    pub cache_dir: PathBuf,

    /// TTL written to new cache entries; `0` never expires
    pub ttl_minutes: u64,

    /// Per-request HTTP timeout
    pub http_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            ttl_minutes: DEFAULT_TTL_MINUTES,
            http_timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    #[serde(default)]
    cache: CacheSection,
    #[serde(default)]
    http: HttpSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CacheSection {
    dir: Option<PathBuf>,
    ttl_minutes: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct HttpSection {
    timeout_secs: Option<u64>,
}

impl Settings {
    /// Load from the user config directory and the process environment.
    pub fn load() -> Result<Self> {
        let config_dir = dirs::config_dir().map(|d| d.join("shipyard"));
        Self::load_with(config_dir.as_deref(), |name| std::env::var(name).ok())
    }

    /// Load with an explicit config directory and environment lookup.
    ///
    /// `config_dir` is the directory holding `settings.toml`; `None` skips
    /// the file layer.
    pub fn load_with<F>(config_dir: Option<&Path>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(dir) = config_dir {
            let path = dir.join(SETTINGS_FILE);
            if path.is_file() {
                tracing::debug!(?path, "Loading settings file");
                settings.apply_file(&path)?;
            } else {
                tracing::debug!(?path, "No settings file, using defaults");
            }
        }

        if let Some(dir) = env(ENV_CACHE_DIR).filter(|v| !v.trim().is_empty()) {
            settings.cache_dir = PathBuf::from(dir);
        }
        if let Some(ttl) = env(ENV_CACHE_TTL) {
            settings.ttl_minutes = parse_env_number(ENV_CACHE_TTL, &ttl)?;
        }
        if let Some(secs) = env(ENV_HTTP_TIMEOUT) {
            let secs = parse_env_number(ENV_HTTP_TIMEOUT, &secs)?;
            settings.http_timeout =
                timeout_from_secs(secs, || PathBuf::from(format!("${ENV_HTTP_TIMEOUT}")))?;
        }

        Ok(settings)
    }

    fn apply_file(&mut self, path: &Path) -> Result<()> {
        let content = shipyard_fs::io::read_text(path)?;
        let file: SettingsFile = toml::from_str(&content).map_err(|e| Error::Settings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if let Some(dir) = file.cache.dir {
            // Relative cache dirs are taken relative to the settings file
            self.cache_dir = match path.parent() {
                Some(parent) if dir.is_relative() => parent.join(dir),
                _ => dir,
            };
        }
        if let Some(ttl) = file.cache.ttl_minutes {
            self.ttl_minutes = ttl;
        }
        if let Some(secs) = file.http.timeout_secs {
            self.http_timeout = timeout_from_secs(secs, || path.to_path_buf())?;
        }
        Ok(())
    }
}

/// HTTP requests are always bounded, so a zero timeout is rejected.
fn timeout_from_secs(secs: u64, origin: impl FnOnce() -> PathBuf) -> Result<Duration> {
    if secs == 0 {
        return Err(Error::Settings {
            path: origin(),
            message: "HTTP timeout must be at least 1 second".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}

fn parse_env_number(name: &str, value: &str) -> Result<u64> {
    value.trim().parse().map_err(|_| Error::Settings {
        path: PathBuf::from(format!("${name}")),
        message: format!("expected a non-negative integer, got '{value}'"),
    })
}
