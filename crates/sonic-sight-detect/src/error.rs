//! Error types for the detection layer.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading sounds or analyzing live audio.
#[derive(Debug, Error)]
pub enum Error {
    /// The analysis chain rejected its input.
    #[error("analysis error: {0}")]
    Analysis(#[from] sonic_sight_analysis::Error),

    /// Detector tunables failed validation.
    #[error("invalid detector config: {0}")]
    InvalidConfig(#[from] sonic_sight_config::ValidationError),

    /// Failed to read a sound file.
    #[error("failed to read sound '{path}': {source}")]
    ReadSound {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a sound file.
    #[error("failed to write sound '{path}': {source}")]
    WriteSound {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Sound JSON is malformed.
    #[error("invalid sound file '{path}': {source}")]
    InvalidSound {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience result type for detection operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn analysis_error_converts() {
        let err: Error = sonic_sight_analysis::Error::InvalidInput("empty".into()).into();
        assert_eq!(err.to_string(), "analysis error: invalid input: empty");
    }

    #[test]
    fn read_sound_exposes_source() {
        let err = Error::ReadSound {
            path: PathBuf::from("/lib/kettle.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "mock"),
        };
        assert!(err.to_string().contains("/lib/kettle.json"));
        assert!(err.source().is_some());
    }
}
