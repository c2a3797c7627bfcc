//! Error types for configuration handling
//!
//! Configuration errors are raised when a config is built or parsed, never
//! at first use. They are fatal to the benchmark run that supplied them.

use thiserror::Error;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Errors raised while building, parsing or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required field was absent or empty
    #[error("Missing required field '{field}' for {backend}")]
    MissingField {
        /// Backend the config was built for
        backend: &'static str,
        /// Name of the missing field
        field: &'static str,
    },

    /// A field was present but its value is unusable
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Field name
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// Collection name is invalid
    #[error("Invalid collection name: {name} ({reason})")]
    InvalidCollectionName {
        /// The invalid name
        name: String,
        /// Reason why it's invalid
        reason: String,
    },

    /// Backend name not recognised
    #[error("Unknown backend: {0}")]
    UnknownBackend(String),

    /// TOML could not be parsed into the expected shape
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// Config could not be serialized
    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    /// Config file could not be read or written
    #[error("Config file '{path}': {source}")]
    Io {
        /// File path
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Check if this error reports an absent required field
    pub fn is_missing_field(&self) -> bool {
        matches!(self, ConfigError::MissingField { .. })
    }

    /// Check if this error is a validation error (as opposed to I/O or parsing)
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            ConfigError::MissingField { .. }
                | ConfigError::InvalidValue { .. }
                | ConfigError::InvalidCollectionName { .. }
                | ConfigError::UnknownBackend(_)
        )
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigError::Serialize(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_display() {
        let err = ConfigError::MissingField {
            backend: "lancedb_cloud",
            field: "api_key",
        };
        assert_eq!(
            err.to_string(),
            "Missing required field 'api_key' for lancedb_cloud"
        );
        assert!(err.is_missing_field());
        assert!(err.is_validation_error());
    }

    #[test]
    fn test_parse_error_is_not_validation() {
        let err = ConfigError::Parse("expected `=`".into());
        assert!(!err.is_validation_error());
        assert!(!err.is_missing_field());
    }

    #[test]
    fn test_toml_error_conversion() {
        let parsed: Result<toml::Value, _> = toml::from_str("uri = ");
        let err: ConfigError = parsed.unwrap_err().into();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
