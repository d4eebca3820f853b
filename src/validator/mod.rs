//! Safety validation of rule expressions
//!
//! Validation is textual and never executes anything. It runs three checks
//! and collects every failure instead of stopping at the first one:
//!
//! 1. the raw text against a denylist of code-injection patterns
//! 2. every identifier outside string literals against the field whitelist
//! 3. a structural parse of the expression, whose leaf fields are checked
//!    against the whitelist as well
//!
//! Callers must refuse to persist any rule whose condition is not valid.

pub mod scanner;


use crate::condition::parser;
use crate::config::{EngineConfig, FieldWhitelist};
use crate::error::Result;
use ahash::AHashSet;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Outcome of validating an expression
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Compiled validation tables
#[derive(Debug, Clone)]
pub struct SafetyValidator {
    whitelist: FieldWhitelist,
    functions: AHashSet<String>,
    reserved_words: AHashSet<String>,
    dangerous_patterns: Vec<Regex>,
    reject_mixed_combinators: bool,
}

impl SafetyValidator {
    /// Compile the validation tables of a configuration
    ///
    /// Fails with `InvalidConfig` if a dangerous pattern is not a valid regex.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let dangerous_patterns = config
            .dangerous_patterns
            .iter()
            .map(|pattern| Regex::new(pattern))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            whitelist: config.whitelist(),
            functions: config.functions.iter().cloned().collect(),
            reserved_words: config
                .reserved_words
                .iter()
                .map(|w| w.to_lowercase())
                .collect(),
            dangerous_patterns,
            reject_mixed_combinators: config.reject_mixed_combinators,
        })
    }

    pub fn whitelist(&self) -> &FieldWhitelist {
        &self.whitelist
    }

    /// Validate an expression, accumulating every problem found
    pub fn validate(&self, expression: &str) -> ValidationResult {
        let mut errors = Vec::new();

        for pattern in &self.dangerous_patterns {
            if pattern.is_match(expression) {
                errors.push(format!(
                    "Expression contains dangerous code (matches /{}/)",
                    pattern.as_str()
                ));
            }
        }

        let mut reported: AHashSet<String> = AHashSet::new();
        for token in scanner::identifiers(expression) {
            if self.is_ignored(token) || self.whitelist.permits(token) {
                continue;
            }
            if reported.insert(token.to_string()) {
                errors.push(format!("Field '{}' is not in whitelist", token));
            }
        }

        if self.reject_mixed_combinators && parser::has_ungrouped_mixed_combinators(expression) {
            errors.push(
                "Expression mixes AND and OR without grouping parentheses".to_string(),
            );
        }

        match parser::parse(expression) {
            // Keywords and function names are skipped by the scan but may still be leaf fields
            Ok(ast) => {
                for leaf in ast.leaves() {
                    if !self.whitelist.permits(&leaf.field) && reported.insert(leaf.field.clone()) {
                        errors.push(format!("Field '{}' is not in whitelist", leaf.field));
                    }
                }
            }
            Err(err) => errors.push(format!("Parse error: {}", err)),
        }

        let result = ValidationResult::from_errors(errors);
        if !result.valid {
            tracing::debug!(expression, errors = ?result.errors, "rule expression rejected");
        }
        result
    }

    fn is_ignored(&self, token: &str) -> bool {
        scanner::is_grammar_keyword(token)
            || self.functions.contains(token)
            || self.reserved_words.contains(&token.to_lowercase())
    }
}
