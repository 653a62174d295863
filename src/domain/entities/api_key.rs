//! Store API key value object.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// API key sent with every store request; masked in logs and debug output.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ApiKey {
    value: String,
}

impl ApiKey {
    /// Creates key, rejecting blank input.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            return None;
        }
        Some(Self { value })
    }

    /// Returns key as string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns masked key for display.
    #[must_use]
    pub fn masked(&self) -> String {
        let len = self.value.chars().count();
        if len <= 10 {
            return "*".repeat(len);
        }

        let prefix: String = self.value.chars().take(4).collect();
        let suffix: String = self.value.chars().skip(len - 4).collect();
        format!("{prefix}...{suffix}")
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("value", &self.masked())
            .finish()
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "AIzaSyExampleExampleExample123";

    #[test]
    fn test_blank_key_rejected() {
        assert!(ApiKey::new("   ").is_none());
    }

    #[test]
    fn test_key_is_trimmed() {
        let key = ApiKey::new(format!("  {KEY}\n")).unwrap();
        assert_eq!(key.as_str(), KEY);
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let key = ApiKey::new(KEY).unwrap();
        let debug_output = format!("{key:?}");

        assert!(!debug_output.contains(KEY));
        assert!(debug_output.contains("AIza...e123"));
    }

    #[test]
    fn test_short_key_fully_masked() {
        let key = ApiKey::new("abc").unwrap();
        assert_eq!(key.masked(), "***");
    }
}
