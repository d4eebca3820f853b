//! Rule expression engine
//!
//! Binds parsing, evaluation, validation and formatting to one frozen
//! configuration. An engine is immutable after construction and can be
//! shared across threads behind an `Arc`.

use crate::condition::{self, ConditionCache, ConditionNode};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::facts::FactRecord;
use crate::validator::{SafetyValidator, ValidationResult};

/// Main rule expression engine
#[derive(Debug)]
pub struct RuleExpressionEngine {
    config: EngineConfig,
    validator: SafetyValidator,
    cache: ConditionCache,
}

impl RuleExpressionEngine {
    /// Build an engine, compiling the configured validation tables
    pub fn new(config: EngineConfig) -> Result<Self> {
        let validator = SafetyValidator::new(&config)?;
        let cache = ConditionCache::new(config.cache_capacity);
        Ok(Self {
            config,
            validator,
            cache,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &ConditionCache {
        &self.cache
    }

    /// Parse a condition string into a fresh tree
    pub fn parse_condition(&self, expression: &str) -> Result<ConditionNode> {
        condition::parse(expression)
    }

    /// Evaluate a parsed tree against a fact record
    pub fn evaluate_condition(&self, ast: &ConditionNode, facts: &FactRecord) -> Result<bool> {
        condition::check(ast, facts)
    }

    /// Parse and evaluate in one call without keeping the tree
    pub fn evaluate_expression(&self, expression: &str, facts: &FactRecord) -> Result<bool> {
        let ast = self.parse_condition(expression)?;
        self.evaluate_condition(&ast, facts)
    }

    /// Parse through the engine's cache, then evaluate
    pub fn evaluate_cached(&self, expression: &str, facts: &FactRecord) -> Result<bool> {
        self.cache.check_condition(expression, facts)
    }

    /// Check an expression against the whitelist, denylist and grammar
    pub fn validate_expression(&self, expression: &str) -> ValidationResult {
        self.validator.validate(expression)
    }

    /// Pretty-print an expression; unparseable input comes back unchanged
    pub fn format_expression(&self, expression: &str) -> String {
        condition::format_expression(expression)
    }
}

impl Default for RuleExpressionEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default()).expect("built-in engine configuration is valid")
    }
}
