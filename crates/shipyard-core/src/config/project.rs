//! Typed project configuration

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Repository layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepoType {
    Monorepo,
    SingleRepo,
}

impl RepoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monorepo => "monorepo",
            Self::SingleRepo => "single-repo",
        }
    }
}

/// Package ecosystem, which decides the manifest that carries the version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    /// `package.json`
    Npm,
    /// `go.mod`
    Go,
    /// `Chart.yaml`
    Helm,
}

/// Semantic version component a change type bumps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bump {
    Major,
    Minor,
    Patch,
}

/// One releasable package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageConfig {
    pub name: String,

    #[serde(default = "default_package_path")]
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecosystem: Option<Ecosystem>,

    /// Manifest file relative to `path`, when not the ecosystem default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<String>,
}

fn default_package_path() -> String {
    ".".to_string()
}

/// An entry in the change-type taxonomy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeType {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bump: Option<Bump>,
}

/// Changelog rendering settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangelogConfig {
    /// Template reference: a local path or any remote reference form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_template: Option<String>,
}

/// A directory setting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    pub path: String,
}

/// The configuration consumed by the rest of the CLI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub repo_type: Option<RepoType>,

    /// `owner/repo` of the hosting repository
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub packages: Vec<PackageConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<PackageConfig>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub change_types: Vec<ChangeType>,

    #[serde(default)]
    pub changelog: ChangelogConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consignments: Option<DirectoryConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<DirectoryConfig>,

    /// Keys this version does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProjectConfig {
    /// Every package, whether declared as a list or singly.
    pub fn all_packages(&self) -> Vec<&PackageConfig> {
        self.packages.iter().chain(self.package.as_ref()).collect()
    }

    pub fn change_type(&self, name: &str) -> Option<&ChangeType> {
        self.change_types.iter().find(|ct| ct.name == name)
    }

    /// Structural problems of a concrete (non-base) project, if any.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if !self.packages.is_empty() && self.package.is_some() {
            problems.push("'packages' and 'package' are mutually exclusive".to_string());
        }

        if self.repo_type == Some(RepoType::Monorepo) && self.packages.is_empty() {
            problems.push("a monorepo must declare at least one entry in 'packages'".to_string());
        }

        if self.repo_type == Some(RepoType::SingleRepo) && self.packages.len() > 1 {
            problems.push("a single-repo project declares one 'package', not a list".to_string());
        }

        let mut seen = HashSet::new();
        for package in &self.packages {
            if !seen.insert(package.name.as_str()) {
                problems.push(format!("duplicate package name '{}'", package.name));
            }
        }

        let mut seen = HashSet::new();
        for change_type in &self.change_types {
            if !seen.insert(change_type.name.as_str()) {
                problems.push(format!("duplicate change type '{}'", change_type.name));
            }
        }

        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn project(value: Value) -> ProjectConfig {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn deserializes_camel_case_keys() {
        let config = project(json!({
            "type": "monorepo",
            "repo": "acme/platform",
            "packages": [{"name": "api", "path": "services/api", "ecosystem": "go"}],
            "changeTypes": [{"name": "feat", "displayName": "Features", "bump": "minor"}],
            "changelog": {"template": "github:acme/shared/changelog.tmpl"},
        }));

        assert_eq!(config.repo_type, Some(RepoType::Monorepo));
        assert_eq!(config.packages[0].ecosystem, Some(Ecosystem::Go));
        assert_eq!(config.change_type("feat").unwrap().bump, Some(Bump::Minor));
        assert_eq!(
            config.changelog.template.as_deref(),
            Some("github:acme/shared/changelog.tmpl")
        );
        assert!(config.problems().is_empty());
    }

    #[test]
    fn unknown_keys_are_kept() {
        let config = project(json!({"type": "single-repo", "customKey": {"a": 1}}));
        assert_eq!(config.extra["customKey"], json!({"a": 1}));
    }

    #[test]
    fn package_path_defaults_to_root() {
        let config = project(json!({"package": {"name": "cli"}}));
        assert_eq!(config.package.unwrap().path, ".");
    }

    #[test]
    fn monorepo_without_packages_is_a_problem() {
        let config = project(json!({"type": "monorepo"}));
        assert_eq!(config.problems().len(), 1);
    }

    #[test]
    fn duplicate_names_are_problems() {
        let config = project(json!({
            "packages": [{"name": "a"}, {"name": "a"}],
            "changeTypes": [{"name": "fix"}, {"name": "fix"}],
        }));
        let problems = config.problems();
        assert!(problems.iter().any(|p| p.contains("duplicate package name 'a'")));
        assert!(problems.iter().any(|p| p.contains("duplicate change type 'fix'")));
    }

    #[test]
    fn packages_and_package_conflict() {
        let config = project(json!({
            "packages": [{"name": "a"}],
            "package": {"name": "b"},
        }));
        assert!(!config.problems().is_empty());
        assert_eq!(config.all_packages().len(), 2);
    }
}
