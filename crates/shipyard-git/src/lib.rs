//! Git transport for shipyard
//!
//! Fetches exactly one file from a remote repository at a branch or tag.
//! Objects land in a bare repository inside a temporary directory that is
//! deleted when the fetch returns; no working tree is ever checked out.

pub mod credentials;
pub mod error;
pub mod fetch;

pub use error::{Error, Result};
pub use fetch::{GitFetcher, is_local_url};
