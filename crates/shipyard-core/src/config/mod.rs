//! Configuration documents and the typed project model
//!
//! Parsing produces a [`ResolvedConfig`], an ordered document that knows
//! nothing about its source format. Merging works on documents; only the
//! final [`MergedConfig`] is converted into the typed [`ProjectConfig`].

mod document;
mod project;

pub use document::{EXTENDS_KEY, PACKAGE_KEY, PACKAGES_KEY, ResolvedConfig};
pub use project::{
    Bump, ChangeType, ChangelogConfig, DirectoryConfig, Ecosystem, PackageConfig, ProjectConfig,
    RepoType,
};

use std::path::Path;

use shipyard_fs::{Format, parse_document};

use crate::{Error, Result};

/// Read and parse a local configuration file.
///
/// The format comes from the file extension, falling back to content
/// sniffing like remote documents.
pub fn read_document(path: &Path) -> Result<ResolvedConfig> {
    let content = shipyard_fs::io::read_text(path)?;
    let source_name = path.display().to_string();
    let format = Format::detect(&source_name, &content);

    let document = parse_document(format, &content, &source_name).map_err(|source| {
        Error::Parse {
            reference: source_name.clone(),
            source,
        }
    })?;
    Ok(ResolvedConfig::from(document))
}

/// Final configuration: the merged document and its typed form.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedConfig {
    /// Merged document, local keys over base keys
    pub document: ResolvedConfig,

    /// Typed view of `document`
    pub project: ProjectConfig,

    /// Reference of the base configuration, when one was applied
    pub base: Option<String>,
}

impl MergedConfig {
    /// Build from a merged document.
    ///
    /// `source_name` labels type errors (a path or reference).
    pub fn new(document: ResolvedConfig, base: Option<String>, source_name: &str) -> Result<Self> {
        let project = document
            .to_typed::<ProjectConfig>()
            .map_err(|e| Error::InvalidProject {
                source_name: source_name.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            document,
            project,
            base,
        })
    }
}
