//! Error types for operator-definition generation

use std::io;
use thiserror::Error;

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, OpGenError>;

/// Errors that can occur while generating operator definitions
///
/// Every variant is fatal: generated code for one malformed operator cannot
/// be trusted to compose with the rest of the artifact, so nothing is
/// caught-and-continued. Fixing the schema and re-running is the only
/// recovery path.
#[derive(Debug, Error)]
pub enum OpGenError {
    #[error("Failed to parse schema document '{path}': {message}")]
    SchemaParse { path: String, message: String },

    #[error("Operator '{op}': {what} name/type/flag lists disagree in length")]
    ListLengthMismatch { op: String, what: &'static str },

    #[error("Operator '{op}': unsupported type '{typename}'")]
    UnsupportedType { op: String, typename: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
