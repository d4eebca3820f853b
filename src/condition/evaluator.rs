//! Condition evaluator

use crate::condition::ast::{Combinator, ConditionNode, LeafCondition, Literal, Operator};
use crate::error::{Result, RuleEngineError};
use crate::facts::{literal_to_number, literal_to_text, FactRecord};

/// Evaluate a condition tree against a fact record
///
/// Only fails with `UnsupportedOperator` for an operator/operand pairing the
/// parser never produces, such as a hand-built `IN` leaf with a scalar.
pub fn check(ast: &ConditionNode, facts: &FactRecord) -> Result<bool> {
    match ast {
        ConditionNode::Leaf(cond) => check_single(cond, facts),
        ConditionNode::Compound {
            combinator: Combinator::And,
            children,
        } => {
            for child in children {
                if !check(child, facts)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        ConditionNode::Compound {
            combinator: Combinator::Or,
            children,
        } => {
            for child in children {
                if check(child, facts)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

fn check_single(cond: &LeafCondition, facts: &FactRecord) -> Result<bool> {
    let field = facts.resolve(&cond.field);

    let result = match (cond.operator, &cond.value) {
        // Membership
        (Operator::In, Literal::List(items)) => items.iter().any(|v| field.strictly_equals(v)),
        (Operator::NotIn, Literal::List(items)) => !items.iter().any(|v| field.strictly_equals(v)),

        // Anything else paired with a list, or a membership test without one
        (Operator::In | Operator::NotIn, _) | (_, Literal::List(_)) => {
            return Err(RuleEngineError::UnsupportedOperator {
                operator: cond.operator.symbol().to_string(),
                operand: cond.value.kind().to_string(),
            })
        }

        // Equality
        (Operator::Equal, value) => field.strictly_equals(value),
        (Operator::NotEqual, value) => !field.strictly_equals(value),

        // Numeric comparisons; NaN on either side compares false
        (Operator::Greater, value) => field.to_number() > literal_to_number(value),
        (Operator::GreaterEqual, value) => field.to_number() >= literal_to_number(value),
        (Operator::Less, value) => field.to_number() < literal_to_number(value),
        (Operator::LessEqual, value) => field.to_number() <= literal_to_number(value),

        // String tests
        (Operator::StartsWith, value) => field.to_text().starts_with(&literal_to_text(value)),
        (Operator::EndsWith, value) => field.to_text().ends_with(&literal_to_text(value)),
        (Operator::Contains, value) => field.to_text().contains(&literal_to_text(value)),
    };

    Ok(result)
}
