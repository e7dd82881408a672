//! Error types for shipyard-core

use std::path::PathBuf;

use crate::reference::ClassifyError;
use crate::transport::{HttpError, TransportError};

/// Result type for shipyard-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// A failed fetch from one candidate endpoint that was not the last one tried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptFailure {
    pub endpoint: String,
    pub message: String,
}

/// Errors that can occur while resolving and loading configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The reference string is malformed
    #[error(transparent)]
    Classification(#[from] ClassifyError),

    /// Every candidate endpoint failed; `source` is the last one's error
    #[error("Failed to fetch '{reference}' from {endpoint}: {source}")]
    Transport {
        reference: String,
        endpoint: String,
        #[source]
        source: TransportError,
        earlier: Vec<AttemptFailure>,
    },

    /// Fetched content is not UTF-8 text
    #[error("Content fetched for '{reference}' from {endpoint} is not valid UTF-8")]
    InvalidUtf8 { reference: String, endpoint: String },

    /// Fetched or local content does not parse in its detected format
    #[error("Failed to parse '{reference}': {source}")]
    Parse {
        reference: String,
        #[source]
        source: shipyard_fs::Error,
    },

    /// A base configuration breaks the rules for inherited documents
    #[error("Invalid base configuration '{reference}': {message}")]
    Validation { reference: String, message: String },

    /// A project configuration is structurally invalid
    #[error("Invalid configuration '{source_name}': {message}")]
    InvalidProject {
        source_name: String,
        message: String,
    },

    /// No configuration file in the searched directory
    #[error("No shipyard configuration found in {dir}")]
    ConfigNotFound { dir: PathBuf },

    /// Engine settings file is malformed
    #[error("Invalid settings in {path}: {message}")]
    Settings { path: PathBuf, message: String },

    /// HTTP client could not be built
    #[error(transparent)]
    HttpClient(#[from] HttpError),

    /// Cache write or administration failure
    #[error(transparent)]
    Cache(#[from] shipyard_cache::Error),

    /// Filesystem error from shipyard-fs
    #[error(transparent)]
    Fs(#[from] shipyard_fs::Error),
}

impl Error {
    /// Failures from candidates tried before the reported one.
    pub fn earlier_failures(&self) -> &[AttemptFailure] {
        match self {
            Self::Transport { earlier, .. } => earlier,
            _ => &[],
        }
    }

    /// Whether the error is about reference syntax.
    pub fn is_classification(&self) -> bool {
        matches!(self, Self::Classification(_))
    }
}
