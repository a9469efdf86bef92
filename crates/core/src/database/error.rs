use thiserror::Error;

use crate::query::{CoercionError, MaterializeError};

/// Errors surfaced by database operations.
///
/// Every failure reaches the caller as one of these variants; nothing is
/// logged and dropped on the way.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Statement preparation failed: {0}")]
    Prepare(String),
    #[error("Statement expects {expected} parameters but {actual} were supplied")]
    ParameterCount { expected: usize, actual: usize },
    #[error("Execution failed: {0}")]
    Execute(String),
    #[error("Result metadata unavailable: {0}")]
    Metadata(String),
    #[error(transparent)]
    Materialize(#[from] MaterializeError),
    #[error(transparent)]
    Coercion(#[from] CoercionError),
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;
