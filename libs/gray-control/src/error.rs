//! Error types for control-plane connectivity.

use thiserror::Error;

/// Errors building control-plane clients from configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The underlying HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
