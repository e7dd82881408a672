//! End-to-end resolution over real transports
//!
//! A local HTTP server stands in for the config host and counts requests,
//! so cache behaviour is observed from the network side.

use std::time::Duration;

use serde_json::json;
use shipyard_cache::{CacheLookup, CacheStore};
use shipyard_core::transport::{Git2Transport, ReqwestTransport};
use shipyard_core::{Error, Resolver};
use shipyard_test_utils::TestServer;
use tempfile::TempDir;

const DOCUMENT: &str = "type: monorepo\nrepo: example/repo";

fn resolver(cache: &TempDir) -> Resolver {
    let http = ReqwestTransport::new(Duration::from_secs(5))
        .unwrap_or_else(|e| panic!("Failed to build HTTP client: {e}"));
    Resolver::with_transports(CacheStore::new(cache.path()), http, Git2Transport::new())
}

#[test]
fn test_second_resolution_is_served_from_cache() {
    let server = TestServer::start(&[("/shipyard.yaml", 200, DOCUMENT)]);
    let cache = TempDir::new().unwrap();
    let url = server.url("/shipyard.yaml");

    let first = resolver(&cache).resolve(&url, false).unwrap();
    // A second resolver over the same directory behaves like a second CLI run
    let second = resolver(&cache).resolve(&url, false).unwrap();

    assert_eq!(server.hits(), 1);
    assert_eq!(first, second);
    assert_eq!(first.get("type"), Some(&json!("monorepo")));
    assert_eq!(first.get("repo"), Some(&json!("example/repo")));
}

#[test]
fn test_force_fresh_fetches_every_time() {
    let server = TestServer::start(&[("/shipyard.yaml", 200, DOCUMENT)]);
    let cache = TempDir::new().unwrap();
    let url = server.url("/shipyard.yaml");

    resolver(&cache).resolve(&url, true).unwrap();
    resolver(&cache).resolve(&url, true).unwrap();

    assert_eq!(server.hits(), 2);
}

#[test]
fn test_shorthand_without_path_fails_before_any_request() {
    let server = TestServer::start(&[("/shipyard.yaml", 200, DOCUMENT)]);
    let cache = TempDir::new().unwrap();

    let err = resolver(&cache)
        .resolve("github:owner/repo", false)
        .unwrap_err();

    assert!(err.is_classification());
    assert!(
        err.to_string()
            .contains("expected github:owner/repo/path"),
        "unexpected message: {err}"
    );
    assert_eq!(server.hits(), 0);
    assert!(std::fs::read_dir(cache.path()).unwrap().next().is_none());
}

#[test]
fn test_server_error_leaves_cache_untouched() {
    let server = TestServer::start(&[("/broken.yaml", 500, "oops")]);
    let cache = TempDir::new().unwrap();
    let url = server.url("/broken.yaml");

    let err = resolver(&cache).resolve(&url, false).unwrap_err();

    assert!(matches!(err, Error::Transport { .. }));
    assert!(err.to_string().contains("500"));
    assert_eq!(CacheStore::new(cache.path()).get(&url), CacheLookup::Miss);
}

#[test]
fn test_json_content_is_sniffed_without_extension() {
    let server = TestServer::start(&[("/config", 200, "{\"type\": \"single-repo\"}")]);
    let cache = TempDir::new().unwrap();

    let config = resolver(&cache)
        .resolve(&server.url("/config"), false)
        .unwrap();

    assert_eq!(config.get("type"), Some(&json!("single-repo")));
}
