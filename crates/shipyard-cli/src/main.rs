//! Shipyard CLI
//!
//! Inspect project configuration, fetch remote bases and templates, and
//! manage the remote configuration cache.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{CacheAction, Cli, Commands, ConfigAction, TemplateAction};
use context::Context;
use error::Result;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "error".red().bold(), e);
        for hint in e.hints() {
            eprintln!("  {}", hint.dimmed());
        }
        std::process::exit(1);
    }
}

/// Logs go to stderr so `--json` output stays parseable.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("{}: tracing subscriber already set", "warning".yellow());
    }
    tracing::debug!("Verbose mode enabled");
}

fn run(cli: Cli) -> Result<()> {
    let ctx = Context::load(cli.cache_dir)?;

    match cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Show { file, fresh, json } => {
                let cwd = std::env::current_dir()?;
                commands::run_config_show(&ctx, &cwd, file.as_deref(), fresh, json)
            }
            ConfigAction::Fetch {
                reference,
                fresh,
                json,
            } => commands::run_config_fetch(&ctx, &reference, fresh, json),
        },
        Commands::Template { action } => match action {
            TemplateAction::Fetch { reference, fresh } => {
                commands::run_template_fetch(&ctx, &reference, fresh)
            }
        },
        Commands::Cache { action } => match action {
            CacheAction::List { json } => commands::run_cache_list(&ctx, json),
            CacheAction::Clear => commands::run_cache_clear(&ctx),
            CacheAction::Inspect { reference } => commands::run_cache_inspect(&ctx, &reference),
        },
    }
}
