//! Secret string wrapper for connection credentials
//!
//! URIs of managed stores and API keys are credentials. They are carried
//! through the config layer as [`SecretString`] so that logging a config or
//! an adapter never prints them.

use serde::{Deserialize, Serialize};
use std::fmt;

const REDACTED: &str = "**********";

/// A string whose `Debug` and `Display` output is redacted
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretString(String);

impl SecretString {
    /// Wrap a secret value
    pub fn new(value: impl Into<String>) -> Self {
        SecretString(value.into())
    }

    /// Access the underlying value
    ///
    /// Call sites should hand the result straight to the collaborator and
    /// never log it.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// True if the secret is empty or only whitespace
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretString({})", REDACTED)
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        SecretString::new(s)
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        SecretString(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_and_display_are_redacted() {
        let secret = SecretString::new("sk-live-123");
        assert_eq!(format!("{:?}", secret), "SecretString(**********)");
        assert_eq!(secret.to_string(), "**********");
        assert_eq!(secret.expose_secret(), "sk-live-123");
    }

    #[test]
    fn test_blank_detection() {
        assert!(SecretString::new("").is_blank());
        assert!(SecretString::new("  \t").is_blank());
        assert!(!SecretString::new("x").is_blank());
    }
}
