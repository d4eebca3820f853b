//! Error types for the rule expression engine

use thiserror::Error;

/// Main error type for the rule expression engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleEngineError {
    #[error("Invalid condition expression: {message} (at '{fragment}')")]
    Parse { message: String, fragment: String },

    #[error("Unsupported operator: {operator} cannot be applied to {operand}")]
    UnsupportedOperator { operator: String, operand: String },

    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),

    #[error("Rule '{rule_id}' rejected: {}", errors.join("; "))]
    RuleRejected { rule_id: String, errors: Vec<String> },
}

impl RuleEngineError {
    /// Build a parse error pointing at the offending part of the expression
    pub fn parse(message: impl Into<String>, fragment: impl Into<String>) -> Self {
        RuleEngineError::Parse {
            message: message.into(),
            fragment: fragment.into(),
        }
    }

    /// Whether this error came from the condition grammar
    pub fn is_parse_error(&self) -> bool {
        matches!(self, RuleEngineError::Parse { .. })
    }
}

impl From<serde_json::Error> for RuleEngineError {
    fn from(err: serde_json::Error) -> Self {
        RuleEngineError::InvalidConfig(err.to_string())
    }
}

impl From<regex::Error> for RuleEngineError {
    fn from(err: regex::Error) -> Self {
        RuleEngineError::InvalidConfig(err.to_string())
    }
}

/// Result type alias for the rule expression engine
pub type Result<T> = std::result::Result<T, RuleEngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display_includes_fragment() {
        let err = RuleEngineError::parse("No operator found", "weight 1000");
        assert!(err.is_parse_error());
        assert_eq!(
            err.to_string(),
            "Invalid condition expression: No operator found (at 'weight 1000')"
        );
    }

    #[test]
    fn test_rule_rejected_joins_errors() {
        let err = RuleEngineError::RuleRejected {
            rule_id: "r1".to_string(),
            errors: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(err.to_string(), "Rule 'r1' rejected: a; b");
        assert!(!err.is_parse_error());
    }
}
