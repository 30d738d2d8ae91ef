//! Error types for fingerprint extraction.

use thiserror::Error;

/// Errors raised by the analysis chain.
#[derive(Debug, Error)]
pub enum Error {
    /// Empty buffer, zero sample rate, or unusable frame parameters.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Signature (de)serialization failed.
    #[error("signature JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type for analysis operations.
pub type Result<T> = std::result::Result<T, Error>;
