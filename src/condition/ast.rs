//! Condition tree for rule expressions

use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed rule condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ConditionNode {
    /// Single comparison like `weight > 1000`
    Leaf(LeafCondition),
    /// AND/OR combination of two or more conditions, in source order
    Compound {
        combinator: Combinator,
        children: Vec<ConditionNode>,
    },
}

impl ConditionNode {
    /// Build a leaf node
    pub fn leaf(field: impl Into<String>, operator: Operator, value: Literal) -> Self {
        ConditionNode::Leaf(LeafCondition {
            field: field.into(),
            operator,
            value,
        })
    }

    /// Build a compound node
    pub fn compound(combinator: Combinator, children: Vec<ConditionNode>) -> Self {
        ConditionNode::Compound {
            combinator,
            children,
        }
    }

    /// Visit every leaf in left-to-right order
    pub fn leaves(&self) -> Vec<&LeafCondition> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a LeafCondition>) {
        match self {
            ConditionNode::Leaf(leaf) => out.push(leaf),
            ConditionNode::Compound { children, .. } => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }
}

/// Single comparison condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafCondition {
    /// Dotted path into the fact record, e.g. `pickup.city`
    pub field: String,
    pub operator: Operator,
    pub value: Literal,
}

/// Logical combinators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Combinator {
    And,
    Or,
}

impl Combinator {
    pub fn keyword(self) -> &'static str {
        match self {
            Combinator::And => "AND",
            Combinator::Or => "OR",
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Greater than or equal (>=)
    #[serde(rename = ">=")]
    GreaterEqual,
    /// Less than or equal (<=)
    #[serde(rename = "<=")]
    LessEqual,
    /// Not equal (!=)
    #[serde(rename = "!=")]
    NotEqual,
    /// Equal (=)
    #[serde(rename = "=")]
    Equal,
    /// Greater than (>)
    #[serde(rename = ">")]
    Greater,
    /// Less than (<)
    #[serde(rename = "<")]
    Less,
    /// Not a member of a list (NOT IN)
    #[serde(rename = "NOT IN")]
    NotIn,
    /// Member of a list (IN)
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "STARTS_WITH")]
    StartsWith,
    #[serde(rename = "ENDS_WITH")]
    EndsWith,
    #[serde(rename = "CONTAINS")]
    Contains,
}

impl Operator {
    /// Operators in the order the parser tries them.
    ///
    /// Multi-character symbols come before their single-character prefixes
    /// and `NOT IN` comes before `IN`.
    pub const PARSE_ORDER: [Operator; 11] = [
        Operator::GreaterEqual,
        Operator::LessEqual,
        Operator::NotEqual,
        Operator::Equal,
        Operator::Greater,
        Operator::Less,
        Operator::NotIn,
        Operator::In,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::Contains,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::GreaterEqual => ">=",
            Operator::LessEqual => "<=",
            Operator::NotEqual => "!=",
            Operator::Equal => "=",
            Operator::Greater => ">",
            Operator::Less => "<",
            Operator::NotIn => "NOT IN",
            Operator::In => "IN",
            Operator::StartsWith => "STARTS_WITH",
            Operator::EndsWith => "ENDS_WITH",
            Operator::Contains => "CONTAINS",
        }
    }

    /// Look up an operator by its source symbol
    pub fn from_symbol(symbol: &str) -> Option<Operator> {
        Self::PARSE_ORDER
            .iter()
            .copied()
            .find(|op| op.symbol() == symbol)
    }

    /// Membership operators take a list literal, all others a scalar
    #[inline]
    pub fn takes_list(self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Literal values on the right-hand side of a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Number(f64),
    Boolean(bool),
    String(String),
    List(Vec<Literal>),
}

impl Literal {
    /// Short name of the literal kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Literal::Number(_) => "number",
            Literal::Boolean(_) => "boolean",
            Literal::String(_) => "string",
            Literal::List(_) => "list",
        }
    }

    #[inline]
    pub fn is_list(&self) -> bool {
        matches!(self, Literal::List(_))
    }
}

impl From<f64> for Literal {
    fn from(n: f64) -> Self {
        Literal::Number(n)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Boolean(b)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}
