//! Error types for shipyard-fs

use std::path::PathBuf;

/// Result type for shipyard-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in shipyard-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} document from {source_name}: {message}")]
    Parse {
        source_name: String,
        format: super::Format,
        message: String,
    },

    #[error("Document from {source_name} must be a mapping at the top level, found {found}")]
    NotAMapping { source_name: String, found: String },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
