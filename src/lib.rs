//! TMS Rule Engine - condition expressions for pricing and payroll rules
//!
//! This crate parses the restricted boolean DSL used by pricing and payroll
//! rules (for example `weight > 1000 AND pickup.city = 'Toronto'`), evaluates
//! parsed conditions against fact records, validates expressions against a
//! field whitelist and a code-injection denylist, and pretty-prints them for
//! display.
//!
//! The free functions below run on a process-wide engine. It uses the
//! built-in configuration until [`init_config`] installs another one.
//!
//! ```
//! use serde_json::json;
//! use tms_rule_engine::{evaluate_rule_expression, validate_expression, FactRecord};
//!
//! let facts = FactRecord::from(json!({"weight": 1500, "pickup": {"city": "Toronto"}}));
//! assert!(evaluate_rule_expression("weight > 1000 AND pickup.city = 'Toronto'", &facts).unwrap());
//! assert!(!validate_expression("secretField > 1").valid);
//! ```

pub mod condition;
pub mod config;
pub mod engine;
pub mod error;
pub mod facts;
pub mod rule;
pub mod validator;

pub use crate::condition::{Combinator, ConditionNode, LeafCondition, Literal, Operator};
pub use crate::config::{EngineConfig, FieldWhitelist};
pub use crate::engine::RuleExpressionEngine;
pub use crate::error::{Result, RuleEngineError};
pub use crate::facts::{FactRecord, Resolved};
pub use crate::rule::{OutcomeStatus, Rule, RuleOutcome, RuleSet, RuleStatus, RuleType};
pub use crate::validator::ValidationResult;

use once_cell::sync::{Lazy, OnceCell};
use parking_lot::RwLock;
use std::sync::Arc;

// ============================================================================
// Shared Engine
// ============================================================================

/// Engine installed by `init_config`
static CONFIGURED_ENGINE: OnceCell<RwLock<Arc<RuleExpressionEngine>>> = OnceCell::new();

/// Engine used until `init_config` is called
static DEFAULT_ENGINE: Lazy<Arc<RuleExpressionEngine>> =
    Lazy::new(|| Arc::new(RuleExpressionEngine::default()));

/// Install the configuration used by the free functions of this crate
///
/// Can be called again to swap the configuration, e.g. after an operator
/// edits the field whitelist. Callers already holding the previous engine
/// keep using it.
pub fn init_config(config: EngineConfig) -> Result<()> {
    let engine = Arc::new(RuleExpressionEngine::new(config)?);

    // If already initialized, update the engine
    if let Some(existing) = CONFIGURED_ENGINE.get() {
        *existing.write() = engine;
    } else if let Err(lost_race) = CONFIGURED_ENGINE.set(RwLock::new(engine)) {
        if let Some(existing) = CONFIGURED_ENGINE.get() {
            *existing.write() = lost_race.into_inner();
        }
    }

    tracing::info!("rule expression engine configured");
    Ok(())
}

/// Check if `init_config` has been called
pub fn is_config_initialized() -> bool {
    CONFIGURED_ENGINE.get().is_some()
}

/// The engine backing the free functions
pub fn shared_engine() -> Arc<RuleExpressionEngine> {
    match CONFIGURED_ENGINE.get() {
        Some(engine) => Arc::clone(&engine.read()),
        None => Arc::clone(&DEFAULT_ENGINE),
    }
}

// ============================================================================
// Free Functions
// ============================================================================

/// Parse a rule condition into a tree
pub fn parse_condition(expression: &str) -> Result<ConditionNode> {
    shared_engine().parse_condition(expression)
}

/// Evaluate a parsed condition against a fact record
pub fn evaluate_condition(ast: &ConditionNode, facts: &FactRecord) -> Result<bool> {
    shared_engine().evaluate_condition(ast, facts)
}

/// Validate a rule condition before it is persisted
pub fn validate_expression(expression: &str) -> ValidationResult {
    shared_engine().validate_expression(expression)
}

/// Pretty-print a rule condition for display
pub fn format_expression(expression: &str) -> String {
    shared_engine().format_expression(expression)
}

/// Alias of [`parse_condition`]
pub fn parse_rule_expression(expression: &str) -> Result<ConditionNode> {
    parse_condition(expression)
}

/// Parse and evaluate in one call
pub fn evaluate_rule_expression(expression: &str, facts: &FactRecord) -> Result<bool> {
    shared_engine().evaluate_expression(expression, facts)
}
