//! Error types for parameter parsing and configuration emission.

use std::path::PathBuf;

/// Errors raised while building a sweep from its raw arguments.
#[derive(Debug, thiserror::Error)]
pub enum ParamError {
    /// The sweep takes exactly six parameter lists.
    #[error("expected {expected} parameter lists, found {found}")]
    WrongArgumentCount {
        /// Number of lists required.
        expected: usize,
        /// Number of lists supplied.
        found: usize,
    },

    /// A list contained no tokens after splitting on separators.
    #[error("parameter list for {parameter} is empty")]
    EmptyList {
        /// Parameter name.
        parameter: &'static str,
    },

    /// A numeric list contained something other than decimal digits.
    #[error("{parameter} value '{token}' is not a nonnegative integer")]
    NotAnInteger {
        /// Parameter name.
        parameter: &'static str,
        /// Offending token.
        token: String,
    },

    /// An enumerated list contained a token outside its vocabulary.
    #[error("{parameter} value '{token}' is not one of {allowed}")]
    UnknownToken {
        /// Parameter name.
        parameter: &'static str,
        /// Offending token.
        token: String,
        /// Comma-separated vocabulary.
        allowed: String,
    },

    /// Writing the configuration artifact failed.
    #[error("cannot write configuration file {}: {source}", path.display())]
    ConfigWrite {
        /// Artifact path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Result type for parameter operations.
pub type Result<T> = std::result::Result<T, ParamError>;
