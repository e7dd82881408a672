//! Git repository fixtures.
//!
//! [`GitFixture`] is a real repository on disk whose branches and tags are
//! built directly with `git2`, so tests do not depend on a `git` binary or
//! on the user's git configuration.

use std::fs;
use std::path::{Path, PathBuf};

use git2::{Oid, Repository, Signature};
use tempfile::TempDir;

/// A temporary git repository that tests can commit files into.
///
/// # Example
///
/// ```rust,no_run
/// use shipyard_test_utils::GitFixture;
///
/// let fixture = GitFixture::new();
/// fixture.commit("main", &[("config/shipyard.yaml", "type: monorepo\n")]);
/// let url = fixture.url();
/// ```
pub struct GitFixture {
    repo: Repository,
    root: PathBuf,
    _temp_dir: TempDir,
}

/// Directory name of the fixture repository. The `.git` suffix lets
/// `git+file://` references find the repository boundary.
const FIXTURE_DIR: &str = "fixture.git";

impl Default for GitFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl GitFixture {
    /// Initialise an empty repository named `fixture.git` in a fresh
    /// temporary directory.
    ///
    /// # Panics
    /// Panics if the repository cannot be created.
    pub fn new() -> Self {
        let temp_dir = TempDir::new()
            .unwrap_or_else(|e| panic!("GitFixture::new: failed to create temp dir: {e}"));
        let root = temp_dir.path().join(FIXTURE_DIR);
        let repo = Repository::init(&root).unwrap_or_else(|e| {
            panic!(
                "GitFixture::new: failed to init repository at {}: {e}",
                root.display()
            )
        });
        Self {
            repo,
            root,
            _temp_dir: temp_dir,
        }
    }

    /// Root of the repository working directory.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// `file://` URL of the repository.
    pub fn url(&self) -> String {
        format!("file://{}", self.path().display())
    }

    /// Commit `files` on top of `branch` (creating the branch if needed).
    ///
    /// Files not listed are carried over from the branch's previous commit.
    ///
    /// # Panics
    /// Panics if any git or filesystem operation fails.
    pub fn commit(&self, branch: &str, files: &[(&str, &str)]) -> Oid {
        let refname = format!("refs/heads/{branch}");
        let parent = self
            .repo
            .find_reference(&refname)
            .ok()
            .and_then(|r| r.peel_to_commit().ok());

        let mut index = self
            .repo
            .index()
            .unwrap_or_else(|e| panic!("GitFixture::commit: failed to open index: {e}"));
        match &parent {
            Some(commit) => {
                let tree = commit.tree().unwrap_or_else(|e| {
                    panic!("GitFixture::commit: failed to read parent tree: {e}")
                });
                index
                    .read_tree(&tree)
                    .unwrap_or_else(|e| panic!("GitFixture::commit: failed to load tree: {e}"));
            }
            None => index
                .clear()
                .unwrap_or_else(|e| panic!("GitFixture::commit: failed to clear index: {e}")),
        }

        for (rel_path, content) in files {
            let full_path = self.path().join(rel_path);
            if let Some(parent_dir) = full_path.parent() {
                fs::create_dir_all(parent_dir).unwrap_or_else(|e| {
                    panic!("GitFixture::commit: failed to create {}: {e}", parent_dir.display())
                });
            }
            fs::write(&full_path, content).unwrap_or_else(|e| {
                panic!("GitFixture::commit: failed to write {}: {e}", full_path.display())
            });
            index
                .add_path(Path::new(rel_path))
                .unwrap_or_else(|e| panic!("GitFixture::commit: failed to stage {rel_path}: {e}"));
        }

        let tree_id = index
            .write_tree()
            .unwrap_or_else(|e| panic!("GitFixture::commit: failed to write tree: {e}"));
        let tree = self
            .repo
            .find_tree(tree_id)
            .unwrap_or_else(|e| panic!("GitFixture::commit: failed to find tree: {e}"));

        let sig = Signature::now("Test User", "test@example.com")
            .unwrap_or_else(|e| panic!("GitFixture::commit: failed to build signature: {e}"));
        let parents: Vec<_> = parent.iter().collect();

        self.repo
            .commit(
                Some(&refname),
                &sig,
                &sig,
                &format!("Update {branch}"),
                &tree,
                &parents,
            )
            .unwrap_or_else(|e| panic!("GitFixture::commit: failed to commit on {branch}: {e}"))
    }

    /// Create a lightweight tag `name` pointing at `target`.
    ///
    /// # Panics
    /// Panics if the tag cannot be created.
    pub fn tag(&self, name: &str, target: Oid) {
        let object = self
            .repo
            .find_object(target, None)
            .unwrap_or_else(|e| panic!("GitFixture::tag: unknown object {target}: {e}"));
        self.repo
            .tag_lightweight(name, &object, false)
            .unwrap_or_else(|e| panic!("GitFixture::tag: failed to create tag {name}: {e}"));
    }
}
