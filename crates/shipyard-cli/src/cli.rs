//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Shipyard - shared release configuration with remote inheritance
#[derive(Parser, Debug)]
#[command(name = "shipyard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory for cached remote configuration
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Project and remote configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Changelog templates
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },

    /// Remote configuration cache administration
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show the effective project configuration
    ///
    /// Examples:
    ///   shipyard config show                 # Discover config in the current directory
    ///   shipyard config show --file ci.yaml  # Use an explicit file
    ///   shipyard config show --fresh --json  # Refetch the base, print JSON
    Show {
        /// Config file to load instead of discovering one
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,

        /// Bypass the cache when fetching the base configuration
        #[arg(long)]
        fresh: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Fetch and print a remote configuration
    Fetch {
        /// Remote reference (https://…, github:…, git+…)
        reference: String,

        /// Bypass the cache
        #[arg(long)]
        fresh: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum TemplateAction {
    /// Fetch a remote changelog template and print it
    Fetch {
        /// Remote reference (https://…, github:…, git+…)
        reference: String,

        /// Bypass the cache
        #[arg(long)]
        fresh: bool,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CacheAction {
    /// List cached entries
    List {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Remove every cached entry
    Clear,

    /// Fetch a reference fresh and show what gets cached
    Inspect {
        /// Remote reference (https://…, github:…, git+…)
        reference: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_config_show_flags() {
        let cli = Cli::try_parse_from(["shipyard", "config", "show", "--fresh", "--json"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Show {
                    file: None,
                    fresh: true,
                    json: true,
                }
            }
        );
    }

    #[test]
    fn parse_global_cache_dir_after_subcommand() {
        let cli = Cli::try_parse_from(["shipyard", "cache", "list", "--cache-dir", "/tmp/c"]).unwrap();
        assert_eq!(cli.cache_dir, Some(PathBuf::from("/tmp/c")));
    }

    #[test]
    fn parse_template_fetch() {
        let cli =
            Cli::try_parse_from(["shipyard", "template", "fetch", "github:o/r/t.tmpl"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Template {
                action: TemplateAction::Fetch {
                    reference: "github:o/r/t.tmpl".to_string(),
                    fresh: false,
                }
            }
        );
    }

    #[test]
    fn reference_is_required() {
        assert!(Cli::try_parse_from(["shipyard", "config", "fetch"]).is_err());
    }
}
