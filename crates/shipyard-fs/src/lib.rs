//! Filesystem and document-format layer for shipyard
//!
//! Provides locked atomic writes, content checksums, and format-agnostic
//! parsing of configuration documents into an ordered key-value map.

pub mod checksum;
pub mod error;
pub mod format;
pub mod io;

pub use checksum::{compute_content_checksum, short_hash};
pub use error::{Error, Result};
pub use format::{Document, Format, parse_document};
