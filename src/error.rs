//! Error types for the terrabreak library.

use thiserror::Error;

/// Result type alias for change-detection operations.
pub type Result<T> = std::result::Result<T, BreakError>;

/// Errors that can occur while planning, reading, fitting, or persisting.
///
/// Only [`BreakError::InvalidJobSpec`], [`BreakError::InvalidConfig`] and
/// I/O setup failures are fatal to a worker; row- and pixel-level errors are
/// contained by the runner.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BreakError {
    /// Job specification out of range; fatal before any row is touched.
    #[error("invalid job spec: job {job_number} of {total_jobs}")]
    InvalidJobSpec {
        job_number: usize,
        total_jobs: usize,
    },

    /// Configuration rejected during validation; fatal before any row is touched.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Observation timestamps violate the strictly-increasing invariant.
    #[error("timestamp error: {0}")]
    Timestamp(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Too few usable observations to fit the configured regression.
    #[error("insufficient observations: need at least {needed}, got {got}")]
    InsufficientObservations { needed: usize, got: usize },

    /// Numeric failure while fitting one segment (e.g. singular design matrix).
    /// Recovered at pixel granularity.
    #[error("pixel fit failed: {0}")]
    PixelFit(String),

    /// One row's source data could not be read. Recovered by skipping the row.
    #[error("row {row} unreadable: {message}")]
    RowRead { row: usize, message: String },

    /// Filesystem failure while committing or loading a row result.
    #[error("i/o error: {0}")]
    Io(String),

    /// Row result document could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for BreakError {
    fn from(err: std::io::Error) -> Self {
        BreakError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BreakError {
    fn from(err: serde_json::Error) -> Self {
        BreakError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = BreakError::InvalidJobSpec {
            job_number: 51,
            total_jobs: 50,
        };
        assert_eq!(err.to_string(), "invalid job spec: job 51 of 50");

        let err = BreakError::InsufficientObservations { needed: 12, got: 7 };
        assert_eq!(
            err.to_string(),
            "insufficient observations: need at least 12, got 7"
        );

        let err = BreakError::RowRead {
            row: 54,
            message: "stack truncated".to_string(),
        };
        assert_eq!(err.to_string(), "row 54 unreadable: stack truncated");

        let err = BreakError::InvalidConfig("min_obs must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "invalid configuration: min_obs must be positive"
        );
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = BreakError::PixelFit("matrix not positive definite".to_string());
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing stack");
        let err: BreakError = io.into();
        assert!(matches!(err, BreakError::Io(_)));
    }
}
