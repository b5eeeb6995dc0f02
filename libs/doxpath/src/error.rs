//! Error types for the path engine

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Path compilation errors.
///
/// Evaluation itself never fails: a missing field or a type mismatch is a
/// "not found" result, not an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Transform not found: {0}")]
    TransformNotFound(String),

    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}
