//! Inheritance of a base configuration
//!
//! A project config may name one base with `extends`. The base is an
//! abstract template: it must not declare packages, and it cannot extend
//! anything itself. Merging is a shallow overlay where every local key
//! replaces the base value wholesale.

use std::path::Path;

use crate::config::{
    EXTENDS_KEY, MergedConfig, PACKAGE_KEY, PACKAGES_KEY, ResolvedConfig, read_document,
};
use crate::reference::classify;
use crate::resolver::Resolver;
use crate::{Error, Result};

/// Overlay `local` on `base`.
///
/// Keys only in `base` keep their position; keys only in `local` are
/// appended. Nested values (package lists, tables) are replaced, never
/// merged.
pub fn overlay(base: &ResolvedConfig, local: &ResolvedConfig) -> ResolvedConfig {
    let mut merged = base.clone();
    for (key, value) in local.iter() {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Check that `base` may be used as an inherited configuration.
pub fn validate_base(reference: &str, base: &ResolvedConfig) -> Result<()> {
    let violation = |message: String| Error::Validation {
        reference: reference.to_string(),
        message,
    };

    if base.declares_packages() {
        return Err(violation(format!(
            "a base configuration must not declare '{PACKAGES_KEY}'; packages belong to the extending project"
        )));
    }

    if base.declares_package() {
        return Err(violation(format!(
            "a base configuration must not declare '{PACKAGE_KEY}'; packages belong to the extending project"
        )));
    }

    if let Some(next) = base.extends() {
        return Err(violation(format!(
            "a base configuration cannot itself use '{EXTENDS_KEY}' (found '{next}'); only one level of inheritance is supported"
        )));
    }

    Ok(())
}

/// Load the base named by `extends_ref` and overlay `local` on it.
///
/// Remote references go through the resolver, which honours the cache
/// unless `force_fresh` is set. Anything else is a file path relative to
/// `base_dir`. Either way the base is validated before merging.
pub fn merge_with_base(
    resolver: &Resolver,
    local: &ResolvedConfig,
    extends_ref: &str,
    base_dir: &Path,
    force_fresh: bool,
) -> Result<MergedConfig> {
    let base = match classify(extends_ref)? {
        Some(_) => resolver.resolve(extends_ref, force_fresh)?,
        None => read_document(&base_dir.join(extends_ref.trim()))?,
    };
    validate_base(extends_ref, &base)?;

    tracing::debug!(base = %extends_ref, keys = base.len(), "Applying base configuration");
    MergedConfig::new(
        overlay(&base, local),
        Some(extends_ref.to_string()),
        extends_ref,
    )
}
