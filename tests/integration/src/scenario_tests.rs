//! Scenario tests spanning git fetches, inheritance and the cache
//!
//! Shorthand references always expand to github.com. To exercise them
//! offline, [`RoutedGit`] maps those endpoints onto local fixtures and
//! delegates to the real libgit2 transport.

use std::collections::HashMap;
use std::thread;

use chrono::{Duration, Utc};
use serde_json::json;
use shipyard_cache::{CacheEntry, CacheStore};
use shipyard_core::loader::ConfigLoader;
use shipyard_core::transport::{Git2Transport, GitTransport, HttpTransport, TransportError};
use shipyard_core::{Error, Resolver};
use shipyard_test_utils::GitFixture;
use tempfile::TempDir;

const BASE: &str = "type: monorepo\nrepo: acme/shared\nchangeTypes:\n  - name: feat\n    bump: minor\n";
const SSH: &str = "git@github.com:acme/shared.git";
const HTTPS: &str = "https://github.com/acme/shared.git";

/// Git transport that serves known endpoints from local repositories.
struct RoutedGit {
    routes: HashMap<String, String>,
    inner: Git2Transport,
}

impl RoutedGit {
    fn new(routes: &[(&str, String)]) -> Self {
        Self {
            routes: routes
                .iter()
                .map(|(from, to)| (from.to_string(), to.clone()))
                .collect(),
            inner: Git2Transport::new(),
        }
    }
}

impl GitTransport for RoutedGit {
    fn fetch_file(
        &self,
        repo_url: &str,
        file_path: &str,
        git_ref: &str,
    ) -> Result<Vec<u8>, TransportError> {
        let target = self.routes.get(repo_url).map(String::as_str).unwrap_or(repo_url);
        self.inner.fetch_file(target, file_path, git_ref)
    }
}

struct NoHttp;

impl HttpTransport for NoHttp {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        Err(TransportError::Other(format!("unexpected HTTP request to {url}")))
    }
}

fn unreachable_repo(temp: &TempDir) -> String {
    format!("file://{}", temp.path().join("missing.git").display())
}

#[test]
fn test_shorthand_falls_back_from_ssh_to_https() {
    let fixture = GitFixture::new();
    fixture.commit("main", &[("config/shipyard.yaml", BASE)]);
    let temp = TempDir::new().unwrap();

    let git = RoutedGit::new(&[(SSH, unreachable_repo(&temp)), (HTTPS, fixture.url())]);
    let resolver = Resolver::with_transports(CacheStore::new(temp.path().join("cache")), NoHttp, git);

    let config = resolver
        .resolve("github:acme/shared/config/shipyard.yaml", false)
        .unwrap();

    assert_eq!(config.get("repo"), Some(&json!("acme/shared")));
}

#[test]
fn test_shorthand_reports_last_failure_when_all_candidates_fail() {
    let fixture = GitFixture::new();
    fixture.commit("main", &[("config/shipyard.yaml", BASE)]);
    let temp = TempDir::new().unwrap();

    let git = RoutedGit::new(&[(SSH, unreachable_repo(&temp)), (HTTPS, fixture.url())]);
    let resolver = Resolver::with_transports(CacheStore::new(temp.path().join("cache")), NoHttp, git);

    let err = resolver
        .resolve("github:acme/shared/config/missing.yaml", false)
        .unwrap_err();

    match &err {
        Error::Transport {
            endpoint, earlier, ..
        } => {
            assert_eq!(endpoint, HTTPS);
            assert_eq!(earlier.len(), 1);
            assert_eq!(earlier[0].endpoint, SSH);
        }
        other => panic!("expected transport error, got {other:?}"),
    }
    assert!(err.to_string().contains("missing.yaml"));
}

#[test]
fn test_tagged_base_is_merged_into_local_project() {
    let fixture = GitFixture::new();
    let v1 = fixture.commit("main", &[("shipyard.yaml", BASE)]);
    fixture.tag("v1", v1);
    fixture.commit("main", &[("shipyard.yaml", "type: single-repo\n")]);

    let temp = TempDir::new().unwrap();
    let project = temp.path().join("project");
    std::fs::create_dir_all(&project).unwrap();
    let config_path = project.join("shipyard.yaml");
    std::fs::write(
        &config_path,
        format!(
            "extends: git+{}/shipyard.yaml@v1\nrepo: acme/app\npackages:\n  - name: api\n",
            fixture.url()
        ),
    )
    .unwrap();

    let loader = ConfigLoader::new(Resolver::with_transports(
        CacheStore::new(temp.path().join("cache")),
        NoHttp,
        Git2Transport::new(),
    ));
    let merged = loader.load_file(&config_path, false).unwrap();

    assert_eq!(merged.document.get("type"), Some(&json!("monorepo")));
    assert_eq!(merged.project.repo.as_deref(), Some("acme/app"));
    assert_eq!(merged.project.change_types[0].name, "feat");
}

#[test]
fn test_stale_entry_from_an_earlier_run_is_refreshed() {
    let fixture = GitFixture::new();
    fixture.commit("main", &[("shipyard.yaml", "version: 2\n")]);
    let temp = TempDir::new().unwrap();
    let cache_root = temp.path().join("cache");
    let reference = format!("git+{}/shipyard.yaml", fixture.url());

    let store = CacheStore::new(&cache_root);
    store
        .put_entry(&CacheEntry::fetched_at(
            &reference,
            "version: 1\n",
            60,
            Utc::now() - Duration::minutes(61),
        ))
        .unwrap();

    let resolver = Resolver::with_transports(CacheStore::new(&cache_root), NoHttp, Git2Transport::new());
    let config = resolver.resolve(&reference, false).unwrap();

    assert_eq!(config.get("version"), Some(&json!(2)));
    assert!(store.get(&reference).is_hit());
}

#[test]
fn test_concurrent_fresh_fetches_leave_a_readable_entry() {
    let fixture = GitFixture::new();
    fixture.commit("main", &[("shipyard.yaml", BASE)]);
    let temp = TempDir::new().unwrap();
    let cache_root = temp.path().join("cache");
    let reference = format!("git+{}/shipyard.yaml", fixture.url());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let cache_root = cache_root.clone();
            let reference = reference.clone();
            thread::spawn(move || {
                let resolver =
                    Resolver::with_transports(CacheStore::new(cache_root), NoHttp, Git2Transport::new());
                resolver.fetch(&reference, true).map(|f| f.content)
            })
        })
        .collect();

    for handle in handles {
        let content = handle.join().unwrap().unwrap();
        assert_eq!(content, BASE);
    }

    let entry = CacheStore::new(&cache_root)
        .get(&reference)
        .into_hit()
        .unwrap();
    assert_eq!(entry.content, BASE);
    assert_eq!(CacheStore::new(&cache_root).list().unwrap().len(), 1);
}
