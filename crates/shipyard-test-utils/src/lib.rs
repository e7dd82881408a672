//! Shared test utilities for the shipyard workspace.
//!
//! Fixtures used by several crate test suites. Dev-dependency only, never
//! published.
//!
//! # Modules
//!
//! - [`git`]: local git repositories with committed files, addressable by `file://` URL
//! - [`http`]: a tiny HTTP server that serves fixed routes and counts requests

pub mod git;
pub mod http;

pub use git::GitFixture;
pub use http::TestServer;
