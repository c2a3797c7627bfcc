//! Error types for the adapter layer

use thiserror::Error;
use vdbbench_client::ClientError;
use vdbbench_core::ConfigError;

/// Errors surfaced to the benchmark driver
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Connection or case configuration is unusable
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The vector store reported a failure
    #[error("Store error: {0}")]
    Client(#[from] ClientError),

    /// Invalid dimension specified (must be > 0)
    #[error("Invalid dimension: {dimension} (must be > 0)")]
    InvalidDimension {
        /// The invalid dimension value
        dimension: usize,
    },

    /// Builder was finished without a required part
    #[error("Adapter builder is missing '{0}'")]
    MissingPart(&'static str),

    /// A result set lacked a projected column
    #[error("Column '{column}' missing from search results")]
    MissingColumn {
        /// Column name
        column: String,
    },

    /// A result column had an unexpected type
    #[error("Column '{column}' has unexpected type (expected {expected})")]
    UnexpectedColumn {
        /// Column name
        column: String,
        /// Expected type
        expected: &'static str,
    },
}

impl AdapterError {
    /// Check if this error indicates a missing table or column
    pub fn is_not_found(&self) -> bool {
        match self {
            AdapterError::Client(e) => e.is_not_found(),
            AdapterError::MissingColumn { .. } => true,
            _ => false,
        }
    }

    /// Check if this error was caused by invalid input
    pub fn is_validation_error(&self) -> bool {
        match self {
            AdapterError::Config(e) => e.is_validation_error(),
            AdapterError::Client(e) => e.is_validation_error(),
            AdapterError::InvalidDimension { .. } | AdapterError::MissingPart(_) => true,
            _ => false,
        }
    }
}

/// Result type for adapter operations
pub type AdapterResult<T> = std::result::Result<T, AdapterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_client_error() {
        let err: AdapterError = ClientError::TableNotFound {
            name: "bench".to_string(),
        }
        .into();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("bench"));
    }

    #[test]
    fn test_from_config_error() {
        let err: AdapterError = ConfigError::MissingField {
            backend: "lancedb_cloud",
            field: "api_key",
        }
        .into();
        assert!(matches!(err, AdapterError::Config(_)));
        assert!(err.is_validation_error());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_invalid_dimension_display() {
        let err = AdapterError::InvalidDimension { dimension: 0 };
        assert_eq!(err.to_string(), "Invalid dimension: 0 (must be > 0)");
        assert!(err.is_validation_error());
    }
}
