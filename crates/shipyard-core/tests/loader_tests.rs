//! Loading project configs, bases and templates over real transports

use std::path::Path;
use std::time::Duration;

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use shipyard_cache::CacheStore;
use shipyard_core::config::RepoType;
use shipyard_core::loader::{CONFIG_DIR, ConfigLoader};
use shipyard_core::transport::{Git2Transport, ReqwestTransport};
use shipyard_core::{Error, Resolver};
use shipyard_test_utils::{GitFixture, TestServer};
use tempfile::TempDir;

const BASE_YAML: &str = "\
type: monorepo
repo: acme/base
changeTypes:
  - name: feat
    bump: minor
  - name: fix
    bump: patch
changelog:
  template: changelog.tmpl
";

fn loader(cache_root: &Path) -> ConfigLoader {
    let http = ReqwestTransport::new(Duration::from_secs(5))
        .unwrap_or_else(|e| panic!("Failed to build HTTP client: {e}"));
    ConfigLoader::new(Resolver::with_transports(
        CacheStore::new(cache_root),
        http,
        Git2Transport::new(),
    ))
}

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, content).unwrap();
    path
}

#[rstest]
#[case(".shipyard/shipyard.yaml")]
#[case(".shipyard/shipyard.toml")]
#[case("shipyard.yml")]
#[case("shipyard.json")]
fn discover_finds_supported_locations(#[case] relative: &str) {
    let temp = TempDir::new().unwrap();
    let path = write(temp.path(), relative, "type: single-repo\n");

    assert_eq!(ConfigLoader::discover(temp.path()).unwrap(), path);
}

#[test]
fn discover_prefers_the_config_directory() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "shipyard.yaml", "type: single-repo\n");
    let nested = write(temp.path(), &format!("{CONFIG_DIR}/shipyard.json"), "{}");

    assert_eq!(ConfigLoader::discover(temp.path()).unwrap(), nested);
}

#[test]
fn discover_reports_missing_config() {
    let temp = TempDir::new().unwrap();
    let err = ConfigLoader::discover(temp.path()).unwrap_err();
    assert!(matches!(err, Error::ConfigNotFound { .. }));
}

#[test]
fn local_project_extends_an_http_base() {
    let server = TestServer::start(&[("/base.yaml", 200, BASE_YAML)]);
    let temp = TempDir::new().unwrap();
    let path = write(
        temp.path(),
        "shipyard.yaml",
        &format!(
            "extends: {}\nrepo: acme/app\npackages:\n  - name: api\n    path: services/api\n",
            server.url("/base.yaml")
        ),
    );

    let config = loader(&temp.path().join("cache"))
        .load_file(&path, false)
        .unwrap();

    assert_eq!(config.base.as_deref(), Some(server.url("/base.yaml").as_str()));
    assert_eq!(config.project.repo_type, Some(RepoType::Monorepo));
    assert_eq!(config.project.repo.as_deref(), Some("acme/app"));
    assert_eq!(config.project.packages.len(), 1);
    assert_eq!(config.project.change_types.len(), 2);
    assert_eq!(server.hits(), 1);
}

#[test]
fn base_is_served_from_cache_on_the_next_load() {
    let server = TestServer::start(&[("/base.yaml", 200, BASE_YAML)]);
    let temp = TempDir::new().unwrap();
    let path = write(
        temp.path(),
        "shipyard.yaml",
        &format!(
            "extends: {}\npackages:\n  - name: api\n",
            server.url("/base.yaml")
        ),
    );
    let loader = loader(&temp.path().join("cache"));

    loader.load_file(&path, false).unwrap();
    loader.load_file(&path, false).unwrap();
    assert_eq!(server.hits(), 1);

    loader.load_file(&path, true).unwrap();
    assert_eq!(server.hits(), 2);
}

#[test]
fn base_declaring_packages_is_rejected_but_accepted_locally() {
    let document = "type: monorepo\npackages:\n  - name: api\n    path: api\n";
    let server = TestServer::start(&[("/base.yaml", 200, document)]);
    let temp = TempDir::new().unwrap();
    let loader = loader(&temp.path().join("cache"));

    let local = write(temp.path(), "plain/shipyard.yaml", document);
    let config = loader.load_file(&local, false).unwrap();
    assert_eq!(config.project.packages[0].name, "api");

    let extending = write(
        temp.path(),
        "extending/shipyard.yaml",
        &format!("extends: {}\n", server.url("/base.yaml")),
    );
    let err = loader.load_file(&extending, false).unwrap_err();
    assert!(matches!(err, Error::Validation { .. }), "got {err:?}");

    let err = loader
        .load_remote_config(&server.url("/base.yaml"), false)
        .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }), "got {err:?}");
}

#[test]
fn local_base_is_read_relative_to_the_config_file() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), ".shipyard/base.yaml", BASE_YAML);
    let path = write(
        temp.path(),
        ".shipyard/shipyard.yaml",
        "extends: base.yaml\npackages:\n  - name: web\n",
    );

    let config = loader(&temp.path().join("cache"))
        .load_file(&path, false)
        .unwrap();

    assert_eq!(config.project.repo.as_deref(), Some("acme/base"));
    assert_eq!(config.project.packages[0].name, "web");
}

#[test]
fn local_keys_win_over_the_base() {
    let server = TestServer::start(&[("/base.yaml", 200, BASE_YAML)]);
    let temp = TempDir::new().unwrap();
    let path = write(
        temp.path(),
        "shipyard.yaml",
        &format!(
            "extends: {}\npackages:\n  - name: api\nchangeTypes:\n  - name: chore\n",
            server.url("/base.yaml")
        ),
    );

    let config = loader(&temp.path().join("cache"))
        .load_file(&path, false)
        .unwrap();

    assert_eq!(
        config.document.get("changeTypes"),
        Some(&json!([{"name": "chore"}]))
    );
    assert_eq!(config.project.changelog.template.as_deref(), Some("changelog.tmpl"));
}

#[test]
fn invalid_merged_project_is_rejected() {
    let server = TestServer::start(&[("/base.yaml", 200, BASE_YAML)]);
    let temp = TempDir::new().unwrap();
    let path = write(
        temp.path(),
        "shipyard.yaml",
        &format!("extends: {}\n", server.url("/base.yaml")),
    );

    let err = loader(&temp.path().join("cache"))
        .load_file(&path, false)
        .unwrap_err();

    assert!(matches!(err, Error::InvalidProject { .. }));
    assert!(err.to_string().contains("monorepo"));
}

#[test]
fn remote_config_is_loaded_from_a_git_repository() {
    let fixture = GitFixture::new();
    fixture.commit("main", &[("configs/shipyard.yaml", BASE_YAML)]);
    let temp = TempDir::new().unwrap();
    let reference = format!("git+{}/configs/shipyard.yaml", fixture.url());

    let config = loader(&temp.path().join("cache"))
        .load_remote_config(&reference, false)
        .unwrap();

    assert_eq!(config.project.repo.as_deref(), Some("acme/base"));
    assert_eq!(config.base.as_deref(), Some(reference.as_str()));
}

#[test]
fn remote_config_rejects_local_paths() {
    let temp = TempDir::new().unwrap();
    let err = loader(&temp.path().join("cache"))
        .load_remote_config("configs/shipyard.yaml", false)
        .unwrap_err();
    assert!(err.is_classification());
}

#[test]
fn http_status_error_is_surfaced() {
    let server = TestServer::start(&[]);
    let temp = TempDir::new().unwrap();

    let err = loader(&temp.path().join("cache"))
        .load_remote_config(&server.url("/missing.yaml"), false)
        .unwrap_err();

    assert!(matches!(err, Error::Transport { .. }));
    assert!(err.to_string().contains("404"));
}

#[test]
fn templates_load_from_remote_and_local_sources() {
    let server = TestServer::start(&[("/changelog.tmpl", 200, "# {{ version }}\n")]);
    let temp = TempDir::new().unwrap();
    write(temp.path(), "templates/local.tmpl", "local body\n");
    let loader = loader(&temp.path().join("cache"));

    let remote = loader
        .load_template(&server.url("/changelog.tmpl"), temp.path(), false)
        .unwrap();
    let again = loader
        .load_remote_template(&server.url("/changelog.tmpl"), false)
        .unwrap();
    let local = loader
        .load_template("templates/local.tmpl", temp.path(), false)
        .unwrap();

    assert_eq!(remote, "# {{ version }}\n");
    assert_eq!(again, remote);
    assert_eq!(server.hits(), 1);
    assert_eq!(local, "local body\n");
}
