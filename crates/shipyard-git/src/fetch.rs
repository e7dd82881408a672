//! Shallow single-ref fetch and single-file extraction

use std::path::Path;

use git2::{AutotagOption, FetchOptions, ObjectType, Repository};

use crate::credentials::ambient_callbacks;
use crate::{Error, Result};

/// Depth used for network remotes
const SHALLOW_DEPTH: i32 = 1;

/// Fetches single files from remote repositories.
#[derive(Debug, Clone)]
pub struct GitFetcher {
    depth: i32,
}

impl Default for GitFetcher {
    fn default() -> Self {
        Self {
            depth: SHALLOW_DEPTH,
        }
    }
}

impl GitFetcher {
    /// Create a fetcher that performs depth-1 fetches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fetcher with a custom history depth. `0` fetches full history.
    pub fn with_depth(depth: i32) -> Self {
        Self {
            depth: depth.max(0),
        }
    }

    /// Fetch the content of `file_path` from `url` at branch or tag `git_ref`.
    ///
    /// Only `git_ref` is fetched, with the configured depth. Objects are
    /// written to a bare repository in a temporary directory, then the file
    /// is resolved through HEAD → commit → tree → blob.
    pub fn fetch_file(&self, url: &str, file_path: &str, git_ref: &str) -> Result<Vec<u8>> {
        let scratch = tempfile::Builder::new()
            .prefix("shipyard-git-")
            .tempdir()?;
        let repo = Repository::init_bare(scratch.path())?;

        tracing::debug!(%url, %git_ref, %file_path, "Fetching single ref");
        self.fetch_ref(&repo, url, git_ref)?;

        let refname = find_fetched_ref(&repo, git_ref).ok_or_else(|| Error::RefNotFound {
            url: url.to_string(),
            git_ref: git_ref.to_string(),
        })?;
        repo.set_head(&refname)?;

        let content = read_file_at_head(&repo, file_path, git_ref)?;
        tracing::debug!(%url, %file_path, bytes = content.len(), "Read file from fetched tree");
        Ok(content)
    }

    fn fetch_ref(&self, repo: &Repository, url: &str, git_ref: &str) -> Result<()> {
        let mut remote = repo.remote_anonymous(url)?;

        let mut options = FetchOptions::new();
        options.remote_callbacks(ambient_callbacks());
        options.download_tags(AutotagOption::None);
        if self.depth > 0 && !is_local_url(url) {
            options.depth(self.depth);
        }

        let refspecs = [
            format!("+refs/heads/{git_ref}:refs/remotes/origin/{git_ref}"),
            format!("+refs/tags/{git_ref}:refs/tags/{git_ref}"),
        ];

        remote
            .fetch(&refspecs, Some(&mut options), None)
            .map_err(|source| Error::Fetch {
                url: url.to_string(),
                source,
            })
    }
}

/// Whether `url` addresses a repository on the local filesystem.
///
/// libgit2's local transport rejects shallow fetches, so these are fetched
/// in full.
pub fn is_local_url(url: &str) -> bool {
    url.starts_with("file://") || Path::new(url).is_absolute()
}

/// Branch first, then tag.
fn find_fetched_ref(repo: &Repository, git_ref: &str) -> Option<String> {
    [
        format!("refs/remotes/origin/{git_ref}"),
        format!("refs/tags/{git_ref}"),
    ]
    .into_iter()
    .find(|name| repo.find_reference(name).is_ok())
}

fn read_file_at_head(repo: &Repository, file_path: &str, git_ref: &str) -> Result<Vec<u8>> {
    let commit = repo.head()?.peel_to_commit()?;
    let tree = commit.tree()?;

    let entry = tree
        .get_path(Path::new(file_path.trim_start_matches('/')))
        .map_err(|_| Error::FileNotFound {
            path: file_path.to_string(),
            git_ref: git_ref.to_string(),
        })?;

    if entry.kind() != Some(ObjectType::Blob) {
        return Err(Error::NotAFile {
            path: file_path.to_string(),
            git_ref: git_ref.to_string(),
        });
    }

    let blob = repo.find_blob(entry.id())?;
    Ok(blob.content().to_vec())
}
