//! Error types for durar operations.
//!
//! A single hand-rolled enum covers every failure mode; no external
//! error crates.

use std::fmt;
use std::path::PathBuf;

/// Errors produced by training, model caching, and prediction queries.
///
/// # Examples
///
/// ```
/// use durar::error::DurarError;
///
/// let err = DurarError::UnknownAttack { name: "frost".to_string() };
/// assert!(err.to_string().contains("frost"));
/// ```
#[derive(Debug)]
pub enum DurarError {
    /// Attack type name not in the closed set {control, sulphate, acid, chloride}.
    UnknownAttack {
        /// Name as supplied by the caller.
        name: String,
    },

    /// Feature matrix and target vector disagree on sample count.
    DimensionMismatch {
        /// Expected dimensions description.
        expected: String,
        /// Actual dimensions found.
        actual: String,
    },

    /// Invalid hyperparameter or query parameter value.
    InvalidParameter {
        /// Parameter name.
        param: String,
        /// Provided value.
        value: String,
        /// Constraint description.
        constraint: String,
    },

    /// Model training failed (empty or malformed calibration data).
    Training {
        /// What went wrong.
        message: String,
    },

    /// Cached model bundle is structurally invalid (missing attack entries).
    Corrupt {
        /// What the bundle is missing.
        message: String,
    },

    /// File I/O error with path context.
    Io {
        /// Path that caused the error.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Bincode serialization/deserialization error.
    Serialization(String),

    /// Generic error with string message.
    Other(String),
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, DurarError>;

impl fmt::Display for DurarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAttack { name } => {
                write!(
                    f,
                    "unknown attack type: {name:?} (expected control, sulphate, acid, or chloride)"
                )
            }
            Self::DimensionMismatch { expected, actual } => {
                write!(f, "dimension mismatch: expected {expected}, got {actual}")
            }
            Self::InvalidParameter {
                param,
                value,
                constraint,
            } => {
                write!(f, "invalid parameter: {param} = {value}, expected {constraint}")
            }
            Self::Training { message } => write!(f, "training failed: {message}"),
            Self::Corrupt { message } => write!(f, "corrupt model bundle: {message}"),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Serialization(msg) => write!(f, "serialization error: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for DurarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<&str> for DurarError {
    fn from(msg: &str) -> Self {
        Self::Other(msg.to_string())
    }
}

impl From<String> for DurarError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}

impl DurarError {
    /// I/O error with the path that produced it.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Dimension mismatch with descriptive context.
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }
}
