//! Cache administration commands

use chrono::Utc;
use colored::Colorize;
use shipyard_core::{CacheEntry, Origin};
use shipyard_fs::{compute_content_checksum, short_hash};

use crate::context::Context;
use crate::error::Result;

/// List cached entries, newest first
pub fn run_cache_list(ctx: &Context, json: bool) -> Result<()> {
    let cache = ctx.cache();
    let entries = cache.list()?;
    let now = Utc::now();

    if json {
        let output: Vec<_> = entries
            .iter()
            .map(|entry| {
                serde_json::json!({
                    "key": entry.source_key,
                    "kind": if entry.is_template() { "template" } else { "config" },
                    "hash": entry.content_hash,
                    "lastFetched": entry.last_fetched.to_rfc3339(),
                    "ttlMinutes": entry.ttl_minutes,
                    "expired": !entry.is_valid_at(now),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!(
            "{} {}",
            "No cached entries in".dimmed(),
            cache.root().display()
        );
        return Ok(());
    }

    println!("{}", "Cached remote configuration".bold());
    println!();
    for entry in &entries {
        print_entry(entry, entry.is_valid_at(now));
    }
    println!();
    println!(
        "{} {} in {}",
        entries.len(),
        if entries.len() == 1 { "entry" } else { "entries" },
        cache.root().display()
    );
    Ok(())
}

/// Remove all cached entries
pub fn run_cache_clear(ctx: &Context) -> Result<()> {
    let cache = ctx.cache();
    let removed = cache.clear()?;
    println!(
        "{} Removed {} cached {} from {}",
        "OK".green().bold(),
        removed,
        if removed == 1 { "entry" } else { "entries" },
        cache.root().display()
    );
    Ok(())
}

/// Fetch a reference fresh and show the resulting entry
pub fn run_cache_inspect(ctx: &Context, reference: &str) -> Result<()> {
    let loader = ctx.loader()?;
    let fetched = loader.resolver().fetch(reference, true)?;

    let endpoint = match &fetched.origin {
        Origin::Network { endpoint } => endpoint.as_str(),
        Origin::Cache { .. } => "(cache)",
    };
    let ttl = loader.resolver().ttl_minutes();

    println!("  {:<12} {}", "Reference:".dimmed(), fetched.reference);
    println!("  {:<12} {}", "Endpoint:".dimmed(), endpoint);
    println!(
        "  {:<12} {}",
        "Hash:".dimmed(),
        compute_content_checksum(&fetched.content)
    );
    println!("  {:<12} {}", "TTL:".dimmed(), format_ttl(ttl));
    println!("  {:<12} {}", "Bytes:".dimmed(), fetched.content.len());
    println!();
    print!("{}", fetched.content);
    if !fetched.content.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn print_entry(entry: &CacheEntry, valid: bool) {
    let status = if valid {
        "valid".green()
    } else {
        "expired".yellow()
    };
    println!(
        "  {} {}  {}  {}  {}",
        status,
        entry.source_key,
        short_hash(&entry.content_hash).dimmed(),
        entry
            .last_fetched
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .dimmed(),
        format_ttl(entry.ttl_minutes).dimmed()
    );
}

fn format_ttl(ttl_minutes: u64) -> String {
    if ttl_minutes == 0 {
        "never expires".to_string()
    } else {
        format!("ttl {ttl_minutes}m")
    }
}
