use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use shipyard_fs::{Error, Format, parse_document};

#[rstest]
// Extension wins over content
#[case("config.json", "type: monorepo", Format::Json)]
#[case("https://example.com/shipyard.toml", "{\"type\":\"monorepo\"}", Format::Toml)]
#[case("configs/base.YML", "{}", Format::Yaml)]
// Content sniffing
#[case("config", "{\"type\":\"monorepo\"}", Format::Json)]
#[case("config", "   \n  {\"type\":\"monorepo\"}", Format::Json)]
// Default
#[case("config", "type: monorepo", Format::Yaml)]
#[case("config.txt", "type = \"monorepo\"", Format::Yaml)]
#[case("", "", Format::Yaml)]
fn test_detect(#[case] hint: &str, #[case] content: &str, #[case] expected: Format) {
    assert_eq!(Format::detect(hint, content), expected);
}

#[test]
fn test_parse_yaml_preserves_key_order() {
    let doc = parse_document(
        Format::Yaml,
        "type: monorepo\nrepo: example/repo\nchangelog:\n  template: default\n",
        "test.yaml",
    )
    .unwrap();

    let keys: Vec<_> = doc.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["type", "repo", "changelog"]);
    assert_eq!(doc["changelog"], json!({"template": "default"}));
}

#[test]
fn test_parse_json() {
    let doc = parse_document(
        Format::Json,
        r#"{"repo": "example/repo", "type": "monorepo"}"#,
        "test.json",
    )
    .unwrap();

    let keys: Vec<_> = doc.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["repo", "type"]);
}

#[test]
fn test_parse_toml() {
    let doc = parse_document(
        Format::Toml,
        "type = \"monorepo\"\n\n[[packages]]\nname = \"api\"\npath = \"services/api\"\n",
        "test.toml",
    )
    .unwrap();

    assert_eq!(doc["type"], json!("monorepo"));
    assert_eq!(doc["packages"][0]["name"], json!("api"));
}

#[test]
fn test_parse_empty_document() {
    for format in [Format::Yaml, Format::Json, Format::Toml] {
        let doc = parse_document(format, "  \n", "empty").unwrap();
        assert!(doc.is_empty(), "{format} should parse empty input");
    }
}

#[test]
fn test_parse_error_names_format_and_source() {
    let err = parse_document(Format::Json, "{not json", "https://example.com/cfg").unwrap_err();
    assert!(matches!(err, Error::Parse { format: Format::Json, .. }));

    let msg = err.to_string();
    assert!(msg.contains("JSON"), "got: {msg}");
    assert!(msg.contains("https://example.com/cfg"), "got: {msg}");
}

#[test]
fn test_parse_rejects_non_mapping_root() {
    let err = parse_document(Format::Yaml, "- a\n- b\n", "list.yaml").unwrap_err();
    assert!(matches!(err, Error::NotAMapping { .. }));
    assert!(err.to_string().contains("a sequence"));
}

#[test]
fn test_parse_toml_datetimes_become_strings() {
    let doc = parse_document(
        Format::Toml,
        "released = 1979-05-27T07:32:00Z\nday = 1979-05-27\n\n[schedule]\nat = 07:32:00\n",
        "test.toml",
    )
    .unwrap();

    assert_eq!(doc["released"], json!("1979-05-27T07:32:00Z"));
    assert_eq!(doc["day"], json!("1979-05-27"));
    assert_eq!(doc["schedule"], json!({"at": "07:32:00"}));
}

#[test]
fn test_parse_toml_scalar_kinds() {
    let doc = parse_document(
        Format::Toml,
        "count = 3\nratio = 0.5\nenabled = true\ntags = [\"a\", \"b\"]\n",
        "test.toml",
    )
    .unwrap();

    assert_eq!(doc["count"], json!(3));
    assert_eq!(doc["ratio"], json!(0.5));
    assert_eq!(doc["enabled"], json!(true));
    assert_eq!(doc["tags"], json!(["a", "b"]));
}
