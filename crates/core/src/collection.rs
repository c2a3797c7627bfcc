//! Collection name validation

use crate::error::ConfigError;

/// Longest collection name accepted
pub const MAX_COLLECTION_NAME_LEN: usize = 256;

/// Validate a collection name
///
/// # Validation Rules
/// - Cannot be empty
/// - Cannot exceed 256 characters
/// - Cannot contain '/' (stores map collections to paths)
/// - Cannot contain null bytes or whitespace
pub fn validate_collection_name(name: &str) -> Result<(), ConfigError> {
    let reject = |reason: &str| -> Result<(), ConfigError> {
        Err(ConfigError::InvalidCollectionName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    if name.is_empty() {
        return reject("Collection name cannot be empty");
    }
    if name.len() > MAX_COLLECTION_NAME_LEN {
        return reject("Collection name cannot exceed 256 characters");
    }
    if name.contains('/') {
        return reject("Collection name cannot contain '/'");
    }
    if name.contains('\0') {
        return reject("Collection name cannot contain null bytes");
    }
    if name.chars().any(char::is_whitespace) {
        return reject("Collection name cannot contain whitespace");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_collection_names() {
        assert!(validate_collection_name("VectorDBBenchCollection").is_ok());
        assert!(validate_collection_name("bench-768_cosine").is_ok());
        assert!(validate_collection_name("a").is_ok());
        assert!(validate_collection_name(&"a".repeat(256)).is_ok());
    }

    #[test]
    fn test_empty_collection_name() {
        let result = validate_collection_name("");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidCollectionName { name, reason })
            if name.is_empty() && reason.contains("empty")
        ));
    }

    #[test]
    fn test_collection_name_too_long() {
        let result = validate_collection_name(&"a".repeat(257));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidCollectionName { reason, .. })
            if reason.contains("256")
        ));
    }

    #[test]
    fn test_collection_name_forbidden_characters() {
        for bad in ["has/slash", "has\0null", "has space"] {
            assert!(
                validate_collection_name(bad).is_err(),
                "{:?} should be rejected",
                bad
            );
        }
    }
}
