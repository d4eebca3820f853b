//! Pretty-printer for condition expressions

use crate::condition::ast::{ConditionNode, Literal};
use crate::condition::parser;
use crate::facts::number_to_text;

/// Re-render an expression as an indented block
///
/// Best effort: input that does not parse, or holds a string literal that
/// cannot be re-quoted, is returned unchanged.
pub fn format_expression(expression: &str) -> String {
    parser::parse(expression)
        .ok()
        .and_then(|ast| format_condition(&ast, 0))
        .unwrap_or_else(|| expression.to_string())
}

/// Render a condition tree at the given nesting depth (two spaces per level)
pub fn format_condition(ast: &ConditionNode, indent: usize) -> Option<String> {
    match ast {
        ConditionNode::Leaf(cond) => Some(format!(
            "{} {} {}",
            cond.field,
            cond.operator,
            format_value(&cond.value)?
        )),
        ConditionNode::Compound {
            combinator,
            children,
        } => {
            let spaces = "  ".repeat(indent);
            let joiner = format!("\n{spaces}  {combinator}\n{spaces}  ");
            let body = children
                .iter()
                .map(|child| format_condition(child, indent + 1))
                .collect::<Option<Vec<_>>>()?
                .join(&joiner);
            Some(format!("(\n{spaces}  {body}\n{spaces})"))
        }
    }
}

/// Render a literal so that it parses back to the same value
///
/// `None` for a string holding both quote characters.
pub fn format_value(value: &Literal) -> Option<String> {
    let text = match value {
        Literal::String(s) if !s.contains('"') => format!("\"{}\"", s),
        Literal::String(s) if !s.contains('\'') => format!("'{}'", s),
        Literal::String(_) => return None,
        Literal::Number(n) => number_to_text(*n),
        Literal::Boolean(b) => b.to_string(),
        Literal::List(items) => format!(
            "({})",
            items
                .iter()
                .map(format_value)
                .collect::<Option<Vec<_>>>()?
                .join(", ")
        ),
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_leaf() {
        assert_eq!(format_expression("weight   >   1000"), "weight > 1000");
        assert_eq!(
            format_expression("customerTier IN ('vip','premium')"),
            "customerTier IN (\"vip\", \"premium\")"
        );
    }

    #[test]
    fn test_format_compound() {
        let formatted = format_expression("weight > 1000 AND pickup.city = 'Toronto'");
        assert_eq!(
            formatted,
            "(\n  weight > 1000\n  AND\n  pickup.city = \"Toronto\"\n)"
        );
    }

    #[test]
    fn test_format_nested_compound() {
        let formatted = format_expression("(weight > 1 OR volume > 2) AND channel = 'web'");
        assert_eq!(
            formatted,
            "(\n  (\n    weight > 1\n    OR\n    volume > 2\n  )\n  AND\n  channel = \"web\"\n)"
        );
    }

    #[test]
    fn test_unparseable_input_is_returned_unchanged() {
        let raw = "weight>1000AND pickup.city='Toronto'";
        assert_eq!(format_expression(raw), raw);
        assert_eq!(format_expression(""), "");
    }

    #[test]
    fn test_formatted_output_parses_back() {
        let expr = "weight > 1 OR volume > 2 AND cargoType = 'say \"hi\"'";
        let first = parser::parse(expr).unwrap();
        let formatted = format_condition(&first, 0).unwrap();
        let second = parser::parse(&formatted).unwrap();
        assert_eq!(first, second);
        assert_eq!(format_expression(&formatted), formatted);
    }

    #[test]
    fn test_format_value_variants() {
        assert_eq!(format_value(&Literal::Number(12.5)).as_deref(), Some("12.5"));
        assert_eq!(format_value(&Literal::Boolean(true)).as_deref(), Some("true"));
        assert_eq!(format_value(&Literal::List(vec![])).as_deref(), Some("()"));
        assert_eq!(format_value(&"it's".into()).as_deref(), Some("\"it's\""));
        assert_eq!(format_value(&"a\"b".into()).as_deref(), Some("'a\"b'"));
        assert_eq!(format_value(&"a'b\"c".into()), None);
    }

    #[test]
    fn test_string_with_both_quote_kinds_is_left_unchanged() {
        let raw = "channel = a'x AND y'\"q\"";
        let ast = parser::parse(raw).unwrap();
        assert_eq!(format_condition(&ast, 0), None);
        assert_eq!(format_expression(raw), raw);
        assert!(parser::parse(&format_expression(raw)).is_ok());
    }
}
