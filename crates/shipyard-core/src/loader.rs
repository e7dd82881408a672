//! Configuration and template loading
//!
//! [`ConfigLoader`] is the entry point used by commands: it finds the local
//! project config, applies its base, and loads remote configs and
//! changelog templates through the shared [`Resolver`].

use std::path::{Path, PathBuf};

use crate::config::{MergedConfig, ResolvedConfig, read_document};
use crate::merge::merge_with_base;
use crate::reference::{RemoteReference, classify};
use crate::resolver::Resolver;
use crate::{Error, Result};

/// Directory that may hold the project config
pub const CONFIG_DIR: &str = ".shipyard";

/// File stem of the project config
pub const CONFIG_STEM: &str = "shipyard";

/// Extensions tried, in order, during discovery
pub const CONFIG_EXTENSIONS: &[&str] = &["yaml", "yml", "json", "toml"];

/// Loads project configuration and templates.
#[derive(Debug)]
pub struct ConfigLoader {
    resolver: Resolver,
}

impl ConfigLoader {
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Find the project config under `dir`.
    ///
    /// `.shipyard/shipyard.<ext>` is preferred over `shipyard.<ext>`.
    pub fn discover(dir: &Path) -> Result<PathBuf> {
        let nested = dir.join(CONFIG_DIR);
        for base in [nested.as_path(), dir] {
            for ext in CONFIG_EXTENSIONS {
                let candidate = base.join(format!("{CONFIG_STEM}.{ext}"));
                if candidate.is_file() {
                    return Ok(candidate);
                }
            }
        }
        Err(Error::ConfigNotFound {
            dir: dir.to_path_buf(),
        })
    }

    /// Discover and load the project config under `dir`.
    pub fn load_dir(&self, dir: &Path, force_fresh: bool) -> Result<MergedConfig> {
        let path = Self::discover(dir)?;
        self.load_file(&path, force_fresh)
    }

    /// Load a local project config and apply its `extends` base.
    ///
    /// A relative local base is read from the config file's directory.
    /// The merged result must be a valid concrete project.
    pub fn load_file(&self, path: &Path, force_fresh: bool) -> Result<MergedConfig> {
        let local = read_document(path)?;
        let source_name = path.display().to_string();
        tracing::debug!(path = %source_name, "Loading project config");

        let merged = match local.extends() {
            Some(extends_ref) => {
                let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
                merge_with_base(&self.resolver, &local, extends_ref, base_dir, force_fresh)?
            }
            None => MergedConfig::new(local, None, &source_name)?,
        };

        let problems = merged.project.problems();
        if !problems.is_empty() {
            return Err(Error::InvalidProject {
                source_name,
                message: problems.join("; "),
            });
        }

        Ok(merged)
    }

    /// Load a remote configuration on its own.
    ///
    /// The remote document is treated as a base: it may not declare
    /// packages or extend anything else.
    pub fn load_remote_config(&self, reference: &str, force_fresh: bool) -> Result<MergedConfig> {
        RemoteReference::parse(reference)?;
        merge_with_base(
            &self.resolver,
            &ResolvedConfig::new(),
            reference,
            Path::new("."),
            force_fresh,
        )
    }

    /// Load a remote changelog template as text.
    pub fn load_remote_template(&self, reference: &str, force_fresh: bool) -> Result<String> {
        self.resolver.fetch_template(reference, force_fresh)
    }

    /// Load a changelog template from a remote reference or a local path
    /// relative to `base_dir`.
    pub fn load_template(
        &self,
        reference: &str,
        base_dir: &Path,
        force_fresh: bool,
    ) -> Result<String> {
        match classify(reference)? {
            Some(_) => self.load_remote_template(reference, force_fresh),
            None => Ok(shipyard_fs::io::read_text(&base_dir.join(reference.trim()))?),
        }
    }
}
