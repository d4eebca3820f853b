//! Engine configuration
//!
//! The tables that drive validation (field whitelist, function names,
//! reserved literals, dangerous-pattern denylist) are plain data so they can
//! be supplied per tenant or per deployment as JSON.

mod whitelist;

pub use whitelist::*;

use crate::condition::DEFAULT_CACHE_CAPACITY;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Fact paths rule conditions may reference out of the box
pub const DEFAULT_FIELD_WHITELIST: [&str; 16] = [
    "weight",
    "volume",
    "cargoType",
    "pickup.city",
    "delivery.city",
    "distanceKm",
    "customerId",
    "customerTier",
    "driverId",
    "driverLevel",
    "waitingTime",
    "tenantId",
    "channel",
    "weekday",
    "timeOfDay",
    "createdAt",
];

/// Function names the validator ignores when scanning for fields
pub const DEFAULT_FUNCTIONS: [&str; 5] = ["round", "ceil", "floor", "min", "max"];

/// Literal keywords the validator ignores (compared case-insensitively)
pub const DEFAULT_RESERVED_WORDS: [&str; 4] = ["true", "false", "null", "undefined"];

/// Code-injection smells rejected by the validator
pub const DEFAULT_DANGEROUS_PATTERNS: [&str; 8] = [
    r"require\s*\(",
    r"import\s+",
    r"eval\s*\(",
    r"Function\s*\(",
    r"process\.",
    r"global\.",
    r"this\.",
    r"window\.",
];

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Exact paths (`weight`), dotted paths (`pickup.city`) or families (`pickup.*`)
    pub field_whitelist: Vec<String>,
    pub functions: Vec<String>,
    pub reserved_words: Vec<String>,
    /// Regular expressions matched against the raw expression text
    pub dangerous_patterns: Vec<String>,
    /// Report `a OR b AND c` style expressions as invalid
    pub reject_mixed_combinators: bool,
    /// Parsed trees kept by the engine; zero disables the cache
    pub cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            field_whitelist: to_strings(&DEFAULT_FIELD_WHITELIST),
            functions: to_strings(&DEFAULT_FUNCTIONS),
            reserved_words: to_strings(&DEFAULT_RESERVED_WORDS),
            dangerous_patterns: to_strings(&DEFAULT_DANGEROUS_PATTERNS),
            reject_mixed_combinators: false,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Deserialize from a JSON document; missing keys keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Add whitelist entries on top of the current ones
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field_whitelist.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn with_reject_mixed_combinators(mut self, reject: bool) -> Self {
        self.reject_mixed_combinators = reject;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Build the lookup form of the field whitelist
    pub fn whitelist(&self) -> FieldWhitelist {
        FieldWhitelist::new(&self.field_whitelist)
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleEngineError;
    use serde_json::json;

    #[test]
    fn test_default_tables() {
        let config = EngineConfig::default();
        assert_eq!(config.field_whitelist.len(), 16);
        assert!(config.field_whitelist.iter().any(|f| f == "pickup.city"));
        assert_eq!(config.dangerous_patterns.len(), 8);
        assert!(!config.reject_mixed_combinators);
        assert_eq!(config.cache_capacity, DEFAULT_CACHE_CAPACITY);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(
            r#"{"field_whitelist": ["weight", "stops.*"], "reject_mixed_combinators": true}"#,
        )
        .unwrap();
        assert_eq!(config.field_whitelist, vec!["weight", "stops.*"]);
        assert!(config.reject_mixed_combinators);
        assert_eq!(config.functions, to_strings(&DEFAULT_FUNCTIONS));
    }

    #[test]
    fn test_from_json_value() {
        let config = EngineConfig::from_json_value(json!({"cache_capacity": 0})).unwrap();
        assert_eq!(config.cache_capacity, 0);
    }

    #[test]
    fn test_malformed_json_is_invalid_config() {
        let err = EngineConfig::from_json_str(r#"{"cache_capacity": "lots"}"#).unwrap_err();
        assert!(matches!(err, RuleEngineError::InvalidConfig(_)));
    }

    #[test]
    fn test_builders() {
        let config = EngineConfig::default()
            .with_fields(["businessType"])
            .with_reject_mixed_combinators(true)
            .with_cache_capacity(4);
        assert!(config.whitelist().permits("businessType"));
        assert!(config.reject_mixed_combinators);
        assert_eq!(config.cache_capacity, 4);
    }
}
