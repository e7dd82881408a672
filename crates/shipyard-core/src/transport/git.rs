//! Git transport backed by shipyard-git

use shipyard_git::GitFetcher;

use super::{GitTransport, TransportError};

/// Shallow single-file fetches through libgit2.
#[derive(Debug, Clone, Default)]
pub struct Git2Transport {
    fetcher: GitFetcher,
}

impl Git2Transport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GitTransport for Git2Transport {
    fn fetch_file(
        &self,
        repo_url: &str,
        file_path: &str,
        git_ref: &str,
    ) -> Result<Vec<u8>, TransportError> {
        Ok(self.fetcher.fetch_file(repo_url, file_path, git_ref)?)
    }
}
