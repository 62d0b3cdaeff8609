//! Error types for merkle_diff

use thiserror::Error;

/// Result type alias for merkle_diff operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur around tree construction: reading input,
/// parsing digests, and loading configuration. Building and diffing
/// trees never fail.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid hash: {0}")]
    InvalidHash(String),

    #[error("Config error: {0}")]
    Config(String),
}
