//! Error types reported by vector-store collaborators

use thiserror::Error;

use crate::memory::Operation;

/// Errors a collaborator can report
#[derive(Debug, Error)]
pub enum ClientError {
    /// Could not establish a connection
    #[error("Connection error: {0}")]
    Connection(String),

    /// Table with given name was not found
    #[error("Table not found: {name}")]
    TableNotFound {
        /// Table name
        name: String,
    },

    /// Table with given name already exists
    #[error("Table already exists: {name}")]
    TableAlreadyExists {
        /// Table name
        name: String,
    },

    /// Schema is unusable or a record does not fit it
    #[error("Schema error: {0}")]
    Schema(String),

    /// Vector width doesn't match the column
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Width declared by the schema
        expected: usize,
        /// Width of the offending vector
        got: usize,
    },

    /// Column referenced by a query or index does not exist
    #[error("Column not found: {name}")]
    ColumnNotFound {
        /// Column name
        name: String,
    },

    /// Index build rejected its parameters
    #[error("Invalid index parameters: {0}")]
    InvalidIndexParams(String),

    /// Query could not be executed as specified
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Filter expression could not be parsed or applied
    #[error("Invalid filter '{expr}': {reason}")]
    InvalidFilter {
        /// The expression as supplied
        expr: String,
        /// Why it was rejected
        reason: String,
    },

    /// Failure injected by a test harness
    #[error("Injected failure in {operation:?}: {message}")]
    Injected {
        /// Operation that failed
        operation: Operation,
        /// Message supplied when the fault was armed
        message: String,
    },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClientError {
    /// Check if this error indicates a missing table or column
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ClientError::TableNotFound { .. } | ClientError::ColumnNotFound { .. }
        )
    }

    /// Check if this error is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            ClientError::Schema(_)
                | ClientError::DimensionMismatch { .. }
                | ClientError::InvalidIndexParams(_)
                | ClientError::InvalidQuery(_)
                | ClientError::InvalidFilter { .. }
        )
    }
}

/// Result type alias for collaborator operations
pub type ClientResult<T> = std::result::Result<T, ClientError>;
