//! Command implementations for shipyard-cli

pub mod cache;
pub mod config;
pub mod template;

pub use cache::{run_cache_clear, run_cache_inspect, run_cache_list};
pub use config::{run_config_fetch, run_config_show};
pub use template::run_template_fetch;
