//! Validated rule collection and per-rule evaluation

use crate::engine::RuleExpressionEngine;
use crate::error::{Result, RuleEngineError};
use crate::facts::FactRecord;
use crate::rule::{Rule, RuleType};
use serde::Serialize;
use std::sync::Arc;

/// How a single rule fared against a fact record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum OutcomeStatus {
    Matched,
    NotMatched,
    /// Evaluation failed; the message is kept and the other rules still run
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleOutcome {
    pub rule_id: String,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

/// Rules whose conditions passed validation
#[derive(Debug, Clone)]
pub struct RuleSet {
    engine: Arc<RuleExpressionEngine>,
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(engine: Arc<RuleExpressionEngine>) -> Self {
        Self {
            engine,
            rules: Vec::new(),
        }
    }

    /// Add a rule, or replace the rule with the same id
    ///
    /// Fails with `RuleRejected` if the condition does not validate.
    pub fn insert(&mut self, rule: Rule) -> Result<()> {
        let validation = self.engine.validate_expression(&rule.condition);
        if !validation.valid {
            tracing::warn!(
                rule_id = %rule.id,
                errors = ?validation.errors,
                "rule rejected"
            );
            return Err(RuleEngineError::RuleRejected {
                rule_id: rule.id,
                errors: validation.errors,
            });
        }

        match self.rules.iter_mut().find(|r| r.id == rule.id) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
        Ok(())
    }

    /// Insert many rules, returning the rejections instead of stopping at one
    pub fn extend<I>(&mut self, rules: I) -> Vec<RuleEngineError>
    where
        I: IntoIterator<Item = Rule>,
    {
        rules
            .into_iter()
            .filter_map(|rule| self.insert(rule).err())
            .collect()
    }

    pub fn remove(&mut self, id: &str) -> Option<Rule> {
        let pos = self.rules.iter().position(|r| r.id == id)?;
        Some(self.rules.remove(pos))
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Active rules, highest priority first; ties keep insertion order
    fn active_by_priority(&self) -> Vec<&Rule> {
        let mut active: Vec<&Rule> = self.rules.iter().filter(|r| r.is_active()).collect();
        active.sort_by(|a, b| b.priority.cmp(&a.priority));
        active
    }

    fn outcome(&self, rule: &Rule, facts: &FactRecord) -> OutcomeStatus {
        match self.engine.evaluate_cached(&rule.condition, facts) {
            Ok(true) => OutcomeStatus::Matched,
            Ok(false) => OutcomeStatus::NotMatched,
            Err(err) => {
                tracing::warn!(rule_id = %rule.id, error = %err, "rule evaluation failed");
                OutcomeStatus::Failed(err.to_string())
            }
        }
    }

    /// Evaluate every active rule; one failing rule never blocks the others
    pub fn evaluate(&self, facts: &FactRecord) -> Vec<RuleOutcome> {
        self.active_by_priority()
            .into_iter()
            .map(|rule| RuleOutcome {
                rule_id: rule.id.clone(),
                status: self.outcome(rule, facts),
            })
            .collect()
    }

    /// Active rules whose condition holds, highest priority first
    pub fn matching(&self, facts: &FactRecord) -> Vec<&Rule> {
        self.active_by_priority()
            .into_iter()
            .filter(|rule| self.outcome(rule, facts) == OutcomeStatus::Matched)
            .collect()
    }

    /// Like [`RuleSet::matching`], restricted to one rule type
    pub fn matching_of_type(&self, rule_type: RuleType, facts: &FactRecord) -> Vec<&Rule> {
        self.active_by_priority()
            .into_iter()
            .filter(|rule| rule.rule_type == rule_type)
            .filter(|rule| self.outcome(rule, facts) == OutcomeStatus::Matched)
            .collect()
    }
}
