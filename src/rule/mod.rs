//! Pricing and payroll rules
//!
//! A rule pairs a condition expression with an opaque action payload. Only
//! the condition is interpreted here; applying actions belongs to the
//! pricing and payroll services.

mod rule_set;

pub use rule_set::*;

use serde::{Deserialize, Serialize};

/// Which business process a rule feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    Pricing,
    Payroll,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatus {
    #[default]
    Active,
    Inactive,
}

/// Persisted rule definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    /// Higher priorities are evaluated first
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub status: RuleStatus,
    pub condition: String,
    #[serde(default)]
    pub actions: serde_json::Value,
}

impl Rule {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        rule_type: RuleType,
        condition: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            rule_type,
            priority: 0,
            status: RuleStatus::Active,
            condition: condition.into(),
            actions: serde_json::Value::Null,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: RuleStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_actions(mut self, actions: serde_json::Value) -> Self {
        self.actions = actions;
        self
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == RuleStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_rule_with_defaults() {
        let rule: Rule = serde_json::from_value(json!({
            "id": "r-1",
            "name": "Heavy freight surcharge",
            "type": "pricing",
            "condition": "weight > 1000",
            "actions": [{"type": "addFee", "params": {"amount": 25}}]
        }))
        .unwrap();

        assert_eq!(rule.rule_type, RuleType::Pricing);
        assert_eq!(rule.priority, 0);
        assert!(rule.is_active());
        assert_eq!(rule.description, None);
        assert_eq!(rule.actions[0]["params"]["amount"], json!(25));
    }

    #[test]
    fn test_builder() {
        let rule = Rule::new("p-1", "Weekend bonus", RuleType::Payroll, "weekday IN ('Sat','Sun')")
            .with_priority(5)
            .with_status(RuleStatus::Inactive)
            .with_actions(json!({"bonus": 40}));
        assert_eq!(rule.priority, 5);
        assert!(!rule.is_active());
        assert_eq!(
            serde_json::to_value(&rule).unwrap()["status"],
            json!("inactive")
        );
    }
}
