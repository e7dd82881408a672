//! Configuration display and remote fetch commands

use std::path::Path;

use colored::Colorize;
use shipyard_core::config::{MergedConfig, ProjectConfig};
use shipyard_core::{ConfigLoader, Origin};

use crate::context::Context;
use crate::error::Result;

/// Display the effective project configuration
pub fn run_config_show(
    ctx: &Context,
    cwd: &Path,
    file: Option<&Path>,
    fresh: bool,
    json: bool,
) -> Result<()> {
    let path = match file {
        Some(file) => cwd.join(file),
        None => ConfigLoader::discover(cwd)?,
    };
    let config = ctx.loader()?.load_file(&path, fresh)?;

    if json {
        let output = serde_json::json!({
            "source": path.display().to_string(),
            "base": config.base,
            "config": config.document,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", "Project Configuration".bold());
    println!();
    println!("  {:<14} {}", "Source:".dimmed(), path.display());
    print_config(&config);
    Ok(())
}

/// Fetch a remote configuration and print it
pub fn run_config_fetch(ctx: &Context, reference: &str, fresh: bool, json: bool) -> Result<()> {
    let loader = ctx.loader()?;
    let fetched = loader.resolver().fetch(reference, fresh)?;
    let document = fetched.parse()?;

    if json {
        let mut output = serde_json::json!({
            "reference": fetched.reference.raw(),
            "config": document,
        });
        match &fetched.origin {
            Origin::Cache { fetched_at } => {
                output["origin"] = "cache".into();
                output["fetchedAt"] = fetched_at.to_rfc3339().into();
            }
            Origin::Network { endpoint } => {
                output["origin"] = "network".into();
                output["endpoint"] = endpoint.as_str().into();
            }
        }
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match &fetched.origin {
        Origin::Cache { fetched_at } => println!(
            "{} {} {}",
            "Cached".cyan().bold(),
            fetched.reference,
            format!("(fetched {})", fetched_at.format("%Y-%m-%d %H:%M:%S UTC")).dimmed()
        ),
        Origin::Network { endpoint } => println!(
            "{} {} {}",
            "Fetched".green().bold(),
            fetched.reference,
            format!("(from {endpoint})").dimmed()
        ),
    }
    println!();
    print!("{}", fetched.content);
    if !fetched.content.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn print_config(config: &MergedConfig) {
    let project: &ProjectConfig = &config.project;

    println!(
        "  {:<14} {}",
        "Base:".dimmed(),
        config.base.as_deref().unwrap_or("(none)")
    );

    println!(
        "  {:<14} {}",
        "Type:".dimmed(),
        project.repo_type.map_or("(unset)", |t| t.as_str())
    );
    println!(
        "  {:<14} {}",
        "Repo:".dimmed(),
        project.repo.as_deref().unwrap_or("(unset)")
    );
    println!();

    let packages = project.all_packages();
    if packages.is_empty() {
        println!("  {:<14} {}", "Packages:".dimmed(), "(none)".dimmed());
    } else {
        println!("  {}:", "Packages".dimmed());
        for package in packages {
            println!("    {} {} {}", "+".green(), package.name, package.path.dimmed());
        }
    }
    println!();

    if project.change_types.is_empty() {
        println!("  {:<14} {}", "Change types:".dimmed(), "(none)".dimmed());
    } else {
        println!("  {}:", "Change types".dimmed());
        for change_type in &project.change_types {
            let label = change_type.display_name.as_deref().unwrap_or("");
            println!("    {} {} {}", "+".green(), change_type.name, label.dimmed());
        }
    }
    println!();

    println!(
        "  {:<14} {}",
        "Changelog:".dimmed(),
        project
            .changelog
            .template
            .as_deref()
            .unwrap_or("(default)")
    );
}
