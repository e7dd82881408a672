//! Format-agnostic configuration document

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shipyard_fs::Document;

/// Key naming the base configuration a document extends
pub const EXTENDS_KEY: &str = "extends";

/// Key holding a monorepo's package list
pub const PACKAGES_KEY: &str = "packages";

/// Key holding a single-repo package
pub const PACKAGE_KEY: &str = "package";

/// A parsed configuration document with its original key order.
///
/// Produced from YAML, JSON or TOML alike; nothing downstream knows which.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedConfig(Document);

impl ResolvedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Keys in document order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Insert or replace a top-level value. Replaced keys keep their position.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_document(&self) -> &Document {
        &self.0
    }

    pub fn into_document(self) -> Document {
        self.0
    }

    /// The `extends` reference, if it is a non-empty string.
    pub fn extends(&self) -> Option<&str> {
        self.0
            .get(EXTENDS_KEY)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Whether the document declares a non-empty package list.
    pub fn declares_packages(&self) -> bool {
        match self.0.get(PACKAGES_KEY) {
            None | Some(Value::Null) => false,
            Some(Value::Array(items)) => !items.is_empty(),
            Some(Value::Object(map)) => !map.is_empty(),
            Some(_) => true,
        }
    }

    /// Whether the document declares a single package.
    pub fn declares_package(&self) -> bool {
        !matches!(self.0.get(PACKAGE_KEY), None | Some(Value::Null))
    }

    /// Deserialize into a typed structure.
    pub fn to_typed<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_value(Value::Object(self.0.clone()))
    }
}

impl From<Document> for ResolvedConfig {
    fn from(document: Document) -> Self {
        Self(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> ResolvedConfig {
        match value {
            Value::Object(map) => ResolvedConfig::from(map),
            _ => panic!("test documents must be objects"),
        }
    }

    #[test]
    fn extends_ignores_blank_and_non_string_values() {
        assert_eq!(doc(json!({"extends": "  "})).extends(), None);
        assert_eq!(doc(json!({"extends": 3})).extends(), None);
        assert_eq!(
            doc(json!({"extends": "github:o/r/base.yaml"})).extends(),
            Some("github:o/r/base.yaml")
        );
    }

    #[test]
    fn empty_package_list_is_not_a_declaration() {
        assert!(!doc(json!({"packages": []})).declares_packages());
        assert!(!doc(json!({"packages": null})).declares_packages());
        assert!(doc(json!({"packages": [{"name": "api"}]})).declares_packages());
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let mut d = doc(json!({"a": 1, "b": 2, "c": 3}));
        d.remove("b");
        assert_eq!(d.keys().collect::<Vec<_>>(), vec!["a", "c"]);
    }
}
