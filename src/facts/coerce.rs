//! Coercions used by the comparison operators

use crate::condition::Literal;
use crate::facts::Resolved;
use chrono::DateTime;
use serde_json::Value;

impl Resolved<'_> {
    /// Numeric view of a fact value, `NaN` when it has none
    pub fn to_number(&self) -> f64 {
        match self {
            Resolved::Absent => f64::NAN,
            Resolved::Present(value) => value_to_number(value),
        }
    }

    /// String view of a fact value; absent fields read as `""`
    pub fn to_text(&self) -> String {
        match self {
            Resolved::Absent => String::new(),
            Resolved::Present(value) => value_to_text(value),
        }
    }

    /// Type-sensitive equality against a literal
    ///
    /// Absent never equals anything, and `"5"` never equals `5`.
    pub fn strictly_equals(&self, literal: &Literal) -> bool {
        let value = match self {
            Resolved::Absent => return false,
            Resolved::Present(value) => value,
        };

        match (value, literal) {
            (Value::Number(n), Literal::Number(m)) => n.as_f64() == Some(*m),
            (Value::String(s), Literal::String(t)) => s == t,
            (Value::Bool(b), Literal::Boolean(c)) => b == c,
            _ => false,
        }
    }
}

fn value_to_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::Bool(b) => bool_to_number(*b),
        Value::Null => 0.0,
        Value::String(s) => text_to_number(s),
        Value::Array(_) | Value::Object(_) => f64::NAN,
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) => number_to_text(f),
            None => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => value_to_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// Numeric view of a literal, `NaN` for lists and non-numeric strings
pub fn literal_to_number(literal: &Literal) -> f64 {
    match literal {
        Literal::Number(n) => *n,
        Literal::Boolean(b) => bool_to_number(*b),
        Literal::String(s) => text_to_number(s),
        Literal::List(_) => f64::NAN,
    }
}

/// String view of a literal
pub fn literal_to_text(literal: &Literal) -> String {
    match literal {
        Literal::Number(n) => number_to_text(*n),
        Literal::Boolean(b) => b.to_string(),
        Literal::String(s) => s.clone(),
        Literal::List(items) => items
            .iter()
            .map(literal_to_text)
            .collect::<Vec<_>>()
            .join(","),
    }
}

/// Render a number in its shortest natural form (`1500`, `1.5`)
pub fn number_to_text(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

#[inline]
fn bool_to_number(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Decimal text parses as a number, RFC 3339 timestamps as epoch milliseconds
fn text_to_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }

    let decimal = s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if decimal {
        if let Ok(n) = s.parse::<f64>() {
            return n;
        }
    }

    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.timestamp_millis() as f64)
        .unwrap_or(f64::NAN)
}
