//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug, PartialEq)]
pub enum ArcadeError {
    /// A batch larger than the number of stored transitions was requested.
    #[error("Insufficient samples: requested {requested}, but only {available} stored")]
    InsufficientSamples {
        /// Requested batch size.
        requested: usize,

        /// Number of transitions in the memory.
        available: usize,
    },

    /// A configuration value is out of its valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}
