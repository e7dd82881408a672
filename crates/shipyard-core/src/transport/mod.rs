//! Transport seam between the resolver and the network
//!
//! The resolver only sees these traits, so tests can substitute fakes and
//! the git library stays behind [`GitTransport`].

mod git;
mod http;

pub use git::Git2Transport;
pub use http::{DEFAULT_TIMEOUT, HttpError, ReqwestTransport};

/// Fetches a file addressed directly by URL.
pub trait HttpTransport {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, TransportError>;
}

/// Fetches a single file from a repository at a branch or tag.
pub trait GitTransport {
    fn fetch_file(
        &self,
        repo_url: &str,
        file_path: &str,
        git_ref: &str,
    ) -> Result<Vec<u8>, TransportError>;
}

/// Failure of a single transport call.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error(transparent)]
    Git(#[from] shipyard_git::Error),

    /// Failure from a transport outside this crate
    #[error("{0}")]
    Other(String),
}
