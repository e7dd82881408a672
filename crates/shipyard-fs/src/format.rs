//! Format detection and format-agnostic document parsing
//!
//! Configuration documents may be YAML, JSON or TOML. The format is chosen
//! from the source's extension when it has a recognized one, otherwise by
//! sniffing the content. Every format parses into the same ordered
//! key-value [`Document`].

use serde_json::{Map, Value};

use crate::{Error, Result};

/// Ordered key-value document produced by [`parse_document`].
pub type Document = Map<String, Value>;

/// Supported serialization formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Yaml,
    Json,
    Toml,
}

impl Format {
    /// Detect format from a file extension (without the dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    /// Detect the format of `content` fetched from `source_hint`.
    ///
    /// 1. A recognized extension on the hint wins.
    /// 2. Content whose first non-whitespace character is `{` is JSON.
    /// 3. Anything else is YAML.
    ///
    /// Detection never fails; malformed documents fail at parse time.
    pub fn detect(source_hint: &str, content: &str) -> Self {
        if let Some(format) = extension_of(source_hint).and_then(Self::from_extension) {
            return format;
        }

        if content.trim_start().starts_with('{') {
            return Self::Json;
        }

        Self::Yaml
    }

    /// Human-readable name of the format
    pub fn name(&self) -> &'static str {
        match self {
            Self::Yaml => "YAML",
            Self::Json => "JSON",
            Self::Toml => "TOML",
        }
    }

    /// Default file extensions for this format
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Yaml => &["yaml", "yml"],
            Self::Json => &["json"],
            Self::Toml => &["toml"],
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Extension of the last path segment of a path or URL.
///
/// Query strings and fragments are ignored, so
/// `https://host/cfg.json?token=x` yields `json`.
fn extension_of(hint: &str) -> Option<&str> {
    let without_query = hint.split(['?', '#']).next().unwrap_or(hint);
    let last_segment = without_query
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(without_query);

    let idx = last_segment.rfind('.')?;
    if idx == 0 || idx + 1 == last_segment.len() {
        return None;
    }
    Some(&last_segment[idx + 1..])
}

/// Parse `content` in the given format into an ordered document.
///
/// Empty documents (and YAML documents that are only comments) yield an
/// empty map. A root that is not a mapping is rejected.
pub fn parse_document(format: Format, content: &str, source_name: &str) -> Result<Document> {
    if content.trim().is_empty() {
        return Ok(Document::new());
    }

    let parse_err = |message: String| Error::Parse {
        source_name: source_name.to_string(),
        format,
        message,
    };

    let value: Value = match format {
        Format::Json => serde_json::from_str(content).map_err(|e| parse_err(e.to_string()))?,
        Format::Yaml => serde_yaml::from_str(content).map_err(|e| parse_err(e.to_string()))?,
        Format::Toml => {
            let table: toml::Table =
                toml::from_str(content).map_err(|e| parse_err(e.to_string()))?;
            toml_to_json(toml::Value::Table(table))
        }
    };

    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Document::new()),
        other => Err(Error::NotAMapping {
            source_name: source_name.to_string(),
            found: value_kind(&other).to_string(),
        }),
    }
}

/// Datetimes become their RFC 3339 text so TOML documents carry the same
/// value kinds as YAML and JSON ones.
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(f.to_string())),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, value)| (key, toml_to_json(value)))
                .collect(),
        ),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
