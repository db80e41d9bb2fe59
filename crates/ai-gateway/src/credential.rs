//! Upstream API credential

use std::fmt;

/// Sentinel shipped in sample configs; treated the same as no key
pub const PLACEHOLDER_API_KEY: &str = "your-api-key-here";

/// API key read once at startup
#[derive(Clone, Default)]
pub struct Credential {
    key: Option<String>,
}

impl Credential {
    /// Create a credential from an optional configured key
    pub fn new(key: Option<String>) -> Self {
        Self { key }
    }

    /// Credential with no key
    pub fn absent() -> Self {
        Self { key: None }
    }

    /// Whether the key is present and not the placeholder sentinel
    pub fn is_usable(&self) -> bool {
        self.usable_key().is_some()
    }

    /// The key, if usable
    pub fn usable_key(&self) -> Option<&str> {
        self.key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && *k != PLACEHOLDER_API_KEY)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match (&self.key, self.is_usable()) {
            (None, _) => "absent",
            (Some(_), false) => "placeholder",
            (Some(_), true) => "<redacted>",
        };
        f.debug_struct("Credential").field("key", &state).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_key() {
        assert!(!Credential::absent().is_usable());
        assert!(!Credential::new(None).is_usable());
    }

    #[test]
    fn test_empty_and_placeholder() {
        assert!(!Credential::new(Some(String::new())).is_usable());
        assert!(!Credential::new(Some("   ".to_string())).is_usable());
        assert!(!Credential::new(Some(PLACEHOLDER_API_KEY.to_string())).is_usable());
    }

    #[test]
    fn test_usable_key() {
        let credential = Credential::new(Some(" sk-test ".to_string()));
        assert!(credential.is_usable());
        assert_eq!(credential.usable_key(), Some("sk-test"));
    }

    #[test]
    fn test_debug_redacts() {
        let credential = Credential::new(Some("sk-secret".to_string()));
        let printed = format!("{:?}", credential);
        assert!(!printed.contains("sk-secret"));
    }
}
