//! Error types for shipyard-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from shipyard-core
    #[error(transparent)]
    Core(#[from] shipyard_core::Error),

    /// Error from the cache store
    #[error(transparent)]
    Cache(#[from] shipyard_cache::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON output could not be produced
    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Extra lines shown under the main error message.
    pub fn hints(&self) -> Vec<String> {
        let Self::Core(err) = self else {
            return Vec::new();
        };

        if err.is_classification() {
            let mut hints = vec!["Supported reference forms:".to_string()];
            hints.extend(
                shipyard_core::SUPPORTED_FORMS
                    .iter()
                    .map(|form| format!("  {form}")),
            );
            return hints;
        }

        err.earlier_failures()
            .iter()
            .map(|failure| format!("also tried {}: {}", failure.endpoint, failure.message))
            .collect()
    }
}
