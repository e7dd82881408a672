//! Error types for shipyard-git

/// Result type for shipyard-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while fetching a file from a repository.
///
/// Each stage of a fetch has its own variant so callers can report which
/// step failed for a given endpoint.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to fetch from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: git2::Error,
    },

    #[error("Ref '{git_ref}' not found in {url}")]
    RefNotFound { url: String, git_ref: String },

    #[error("File '{path}' not found at ref '{git_ref}'")]
    FileNotFound { path: String, git_ref: String },

    #[error("'{path}' at ref '{git_ref}' is not a file")]
    NotAFile { path: String, git_ref: String },

    #[error("Failed to prepare temporary object store: {0}")]
    Workspace(#[from] std::io::Error),

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),
}
