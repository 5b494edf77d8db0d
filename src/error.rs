//! Error types for Neura9 operations.
//!
//! Provides rich error context for pipeline consumers.

use std::fmt;

/// Result type alias for Neura9 operations.
pub type Result<T> = std::result::Result<T, Neura9Error>;

/// Main error type for Neura9 operations.
///
/// # Examples
///
/// ```
/// use neura9::error::Neura9Error;
///
/// let err = Neura9Error::DimensionMismatch {
///     expected: "72".to_string(),
///     actual: "70".to_string(),
/// };
/// assert!(err.to_string().contains("dimension mismatch"));
/// ```
#[derive(Debug)]
pub enum Neura9Error {
    /// Matrix/vector dimensions don't match for the operation.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Dataset row that cannot be parsed against the expected schema.
    MalformedRow {
        /// 1-based line number in the source file
        line: usize,
        /// What was wrong with the row
        message: String,
    },

    /// Distinct label count differs from the configured class count.
    ClassCountMismatch {
        /// Distinct labels found in the dataset
        found: usize,
        /// Class count the model was built with
        expected: usize,
    },

    /// Invalid hyperparameter value provided.
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Invalid or corrupt model/artifact format.
    FormatError {
        /// Error description
        message: String,
    },

    /// Checksum verification failed.
    ChecksumMismatch {
        /// Expected checksum
        expected: u32,
        /// Actual checksum
        actual: u32,
    },

    /// I/O error (file not found, permission denied, etc.).
    Io(std::io::Error),

    /// Serialization/deserialization error.
    Serialization(String),

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for Neura9Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Neura9Error::DimensionMismatch { expected, actual } => {
                write!(f, "dimension mismatch: expected {expected}, got {actual}")
            }
            Neura9Error::MalformedRow { line, message } => {
                write!(f, "malformed dataset row at line {line}: {message}")
            }
            Neura9Error::ClassCountMismatch { found, expected } => {
                write!(
                    f,
                    "dataset contains {found} distinct classes, model expects {expected}"
                )
            }
            Neura9Error::InvalidHyperparameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "invalid hyperparameter: {param} = {value}, expected {constraint}"
                )
            }
            Neura9Error::FormatError { message } => {
                write!(f, "invalid model format: {message}")
            }
            Neura9Error::ChecksumMismatch { expected, actual } => {
                write!(
                    f,
                    "checksum mismatch: expected 0x{expected:08X}, got 0x{actual:08X}"
                )
            }
            Neura9Error::Io(e) => write!(f, "I/O error: {e}"),
            Neura9Error::Serialization(msg) => write!(f, "serialization error: {msg}"),
            Neura9Error::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Neura9Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Neura9Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Neura9Error {
    fn from(err: std::io::Error) -> Self {
        Neura9Error::Io(err)
    }
}

impl From<&str> for Neura9Error {
    fn from(msg: &str) -> Self {
        Neura9Error::Other(msg.to_string())
    }
}

impl From<String> for Neura9Error {
    fn from(msg: String) -> Self {
        Neura9Error::Other(msg)
    }
}

impl From<serde_json::Error> for Neura9Error {
    fn from(err: serde_json::Error) -> Self {
        Neura9Error::Serialization(err.to_string())
    }
}
