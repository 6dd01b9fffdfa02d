//! Engine configuration

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tag key used when none is configured.
pub const DEFAULT_TAG_NAME: &str = "valid";

/// Distinct tag strings an engine keeps parsed when none is configured.
pub const DEFAULT_TAG_CACHE_CAPACITY: usize = 1024;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Tag key the engine reads rule strings from (e.g. "valid", "validate")
    pub tag_name: String,

    /// Load the built-in rules and their default messages
    pub builtin_rules: bool,

    /// Default messages merged over the built-in ones, keyed by rule name
    pub default_messages: HashMap<String, String>,

    /// Upper bound on cached parsed tags; tags past it are parsed per use
    pub tag_cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tag_name: DEFAULT_TAG_NAME.to_owned(),
            builtin_rules: true,
            default_messages: HashMap::new(),
            tag_cache_capacity: DEFAULT_TAG_CACHE_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Configuration reading rules from `tag_name`.
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Self::default()
        }
    }

    /// Sets whether built-in rules are loaded.
    #[must_use]
    pub fn with_builtin_rules(mut self, enabled: bool) -> Self {
        self.builtin_rules = enabled;
        self
    }

    /// Adds or replaces one default message.
    #[must_use]
    pub fn with_default_message(
        mut self,
        rule: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        self.default_messages.insert(rule.into(), template.into());
        self
    }

    /// Sets the tag cache bound.
    #[must_use]
    pub fn with_tag_cache_capacity(mut self, capacity: usize) -> Self {
        self.tag_cache_capacity = capacity;
        self
    }

    /// Checks that the configuration can build an engine.
    pub fn validate(&self) -> Result<()> {
        if self.tag_name.trim().is_empty() {
            return Err(Error::InvalidConfig {
                reason: "tag_name must not be empty".to_owned(),
            });
        }
        if self.tag_name.chars().any(char::is_whitespace) {
            return Err(Error::InvalidConfig {
                reason: format!("tag_name `{}` must not contain whitespace", self.tag_name),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.tag_name, "valid");
        assert!(config.builtin_rules);
        assert!(config.default_messages.is_empty());
        assert_eq!(config.tag_cache_capacity, DEFAULT_TAG_CACHE_CAPACITY);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn deserializes_partial_json() {
        let config: EngineConfig = serde_json::from_str(
            r#"{ "tag_name": "validate", "tag_cache_capacity": 16, "default_messages": { "required": "%s missing" } }"#,
        )
        .unwrap();

        assert_eq!(config.tag_name, "validate");
        assert!(config.builtin_rules);
        assert_eq!(config.tag_cache_capacity, 16);
        assert_eq!(
            config.default_messages.get("required").map(String::as_str),
            Some("%s missing")
        );
    }

    #[test]
    fn rejects_blank_tag_name() {
        for tag in ["", "   ", "my tag"] {
            let err = EngineConfig::new(tag).validate().unwrap_err();
            assert_eq!(err.code(), "CONFIG_INVALID");
        }
    }
}
