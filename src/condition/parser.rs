//! Condition string parser
//!
//! Grammar, with case-sensitive keywords:
//!
//! ```text
//! condition := group | compound | leaf
//! group     := '(' condition ')'
//! compound  := condition (' AND ' condition)+ | condition (' OR ' condition)+
//! leaf      := field ' ' operator ' ' value
//! value     := quoted-string | number | 'true' | 'false' | '(' value (',' value)* ')' | bare-word
//! ```
//!
//! ` AND ` is split before ` OR `, so `a OR b AND c` parses as `(a OR b) AND c`.
//! Separators inside quotes or parentheses are never split on.

use crate::condition::ast::{Combinator, ConditionNode, LeafCondition, Literal, Operator};
use crate::error::{Result, RuleEngineError};
use once_cell::sync::Lazy;
use regex::Regex;

static NUMBER_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[0-9]+\.?[0-9]*$").expect("number literal pattern is valid"));

/// Parse a condition string into a condition tree
pub fn parse(expression: &str) -> Result<ConditionNode> {
    let normalized = normalize_whitespace(expression);
    let result = if normalized.is_empty() {
        Err(RuleEngineError::parse("Empty condition", expression))
    } else {
        check_balanced(&normalized).and_then(|_| parse_condition(&normalized))
    };

    if let Err(ref err) = result {
        tracing::debug!(expression, error = %err, "failed to parse condition expression");
    }
    result
}

/// Collapse whitespace runs to a single space and trim both ends
pub fn normalize_whitespace(expression: &str) -> String {
    expression.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether some nesting level mixes ` AND ` and ` OR ` without grouping parentheses
pub fn has_ungrouped_mixed_combinators(expression: &str) -> bool {
    mixed_at_level(&normalize_whitespace(expression))
}

fn mixed_at_level(expr: &str) -> bool {
    let expr = expr.trim();
    if let Some(inner) = strip_group(expr) {
        return mixed_at_level(inner);
    }

    let and_parts = split_top_level(expr, separator(Combinator::And));
    let or_parts = split_top_level(expr, separator(Combinator::Or));
    if and_parts.len() > 1 && or_parts.len() > 1 {
        return true;
    }

    let parts = if and_parts.len() > 1 { and_parts } else { or_parts };
    parts.len() > 1 && parts.iter().any(|part| mixed_at_level(part))
}

fn separator(combinator: Combinator) -> &'static str {
    match combinator {
        Combinator::And => " AND ",
        Combinator::Or => " OR ",
    }
}

fn parse_condition(expr: &str) -> Result<ConditionNode> {
    let expr = expr.trim();
    if expr.is_empty() {
        return Err(RuleEngineError::parse("Empty condition segment", expr));
    }

    if let Some(inner) = strip_group(expr) {
        return parse_condition(inner);
    }

    for combinator in [Combinator::And, Combinator::Or] {
        let parts = split_top_level(expr, separator(combinator));
        if parts.len() >= 2 {
            let children = parts
                .into_iter()
                .map(parse_condition)
                .collect::<Result<Vec<_>>>()?;
            return Ok(ConditionNode::compound(combinator, children));
        }
    }

    parse_single_condition(expr).map(ConditionNode::Leaf)
}

fn parse_single_condition(condition: &str) -> Result<LeafCondition> {
    for operator in Operator::PARSE_ORDER {
        let sep = format!(" {} ", operator.symbol());
        let parts = split_top_level(condition, &sep);
        if parts.len() != 2 {
            continue;
        }

        let field = parts[0].trim();
        let raw_value = parts[1].trim();
        if field.is_empty() || raw_value.is_empty() {
            return Err(RuleEngineError::parse(
                "Comparison needs a field and a value",
                condition,
            ));
        }
        if !is_field_path(field) {
            return Err(RuleEngineError::parse("Invalid field path", field));
        }

        let value = parse_value(raw_value)?;
        if operator.takes_list() && !value.is_list() {
            return Err(RuleEngineError::parse(
                format!("Operator {} requires a parenthesized list", operator),
                raw_value,
            ));
        }
        if !operator.takes_list() && value.is_list() {
            return Err(RuleEngineError::parse(
                format!("Operator {} does not accept a list", operator),
                raw_value,
            ));
        }

        return Ok(LeafCondition {
            field: field.to_string(),
            operator,
            value,
        });
    }

    Err(RuleEngineError::parse("No operator found", condition))
}

/// Parse the right-hand side of a comparison
pub fn parse_value(value_str: &str) -> Result<Literal> {
    let value_str = value_str.trim();

    if let Some(inner) = strip_quotes(value_str) {
        return Ok(Literal::String(inner.to_string()));
    }

    if NUMBER_LITERAL.is_match(value_str) {
        return value_str
            .parse::<f64>()
            .map(Literal::Number)
            .map_err(|_| RuleEngineError::parse("Invalid number", value_str));
    }

    match value_str {
        "true" => return Ok(Literal::Boolean(true)),
        "false" => return Ok(Literal::Boolean(false)),
        _ => {}
    }

    if value_str.starts_with('(') && value_str.ends_with(')') {
        let inner = value_str[1..value_str.len() - 1].trim();
        if inner.is_empty() {
            return Ok(Literal::List(Vec::new()));
        }

        let mut items = Vec::new();
        for item in split_top_level(inner, ",") {
            let item = item.trim();
            if item.is_empty() {
                return Err(RuleEngineError::parse("Empty list item", value_str));
            }
            items.push(parse_value(item)?);
        }
        return Ok(Literal::List(items));
    }

    // Bare words are string literals
    Ok(Literal::String(value_str.to_string()))
}

fn strip_quotes(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    if bytes.len() < 2 {
        return None;
    }
    let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
    if (first == b'\'' || first == b'"') && first == last {
        Some(&s[1..s.len() - 1])
    } else {
        None
    }
}

/// Dotted identifiers; segments after the first may also be array indices
fn is_field_path(field: &str) -> bool {
    field.split('.').enumerate().all(|(i, segment)| {
        let mut chars = segment.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            Some(c) if i > 0 && c.is_ascii_digit() => chars.all(|c| c.is_ascii_digit()),
            _ => false,
        }
    })
}

/// Strip one pair of parentheses wrapping the whole expression
fn strip_group(expr: &str) -> Option<&str> {
    if !expr.starts_with('(') || !expr.ends_with(')') {
        return None;
    }

    let mut depth = 0i32;
    let mut quote: Option<u8> = None;
    let last = expr.len() - 1;
    for (i, &b) in expr.as_bytes().iter().enumerate() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'\'' | b'"' => quote = Some(b),
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 && i != last {
                        return None;
                    }
                }
                _ => {}
            },
        }
    }

    Some(expr[1..last].trim())
}

/// Split on `sep` wherever it appears outside quotes and parentheses
fn split_top_level<'a>(s: &'a str, sep: &str) -> Vec<&'a str> {
    let bytes = s.as_bytes();
    let sep_bytes = sep.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<u8> = None;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == q {
                    quote = None;
                }
            }
            None => {
                if depth == 0 && bytes[i..].starts_with(sep_bytes) {
                    parts.push(&s[start..i]);
                    i += sep_bytes.len();
                    start = i;
                    continue;
                }
                match b {
                    b'\'' | b'"' => quote = Some(b),
                    b'(' => depth += 1,
                    b')' => depth -= 1,
                    _ => {}
                }
            }
        }
        i += 1;
    }

    parts.push(&s[start..]);
    parts
}

fn check_balanced(expr: &str) -> Result<()> {
    let mut depth = 0i32;
    let mut quote: Option<u8> = None;
    for &b in expr.as_bytes() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'\'' | b'"' => quote = Some(b),
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth < 0 {
                        break;
                    }
                }
                _ => {}
            },
        }
    }

    if quote.is_some() {
        return Err(RuleEngineError::parse("Unterminated string literal", expr));
    }
    if depth != 0 {
        return Err(RuleEngineError::parse("Unbalanced parentheses", expr));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(node: &ConditionNode) -> &LeafCondition {
        match node {
            ConditionNode::Leaf(leaf) => leaf,
            other => panic!("Expected leaf, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_simple_condition() {
        let ast = parse("weight > 1000").unwrap();
        assert_eq!(
            ast,
            ConditionNode::leaf("weight", Operator::Greater, Literal::Number(1000.0))
        );
    }

    #[test]
    fn test_parse_and_condition() {
        let ast = parse("pickup.city = 'Toronto' AND weight > 500").unwrap();
        assert_eq!(
            ast,
            ConditionNode::compound(
                Combinator::And,
                vec![
                    ConditionNode::leaf("pickup.city", Operator::Equal, "Toronto".into()),
                    ConditionNode::leaf("weight", Operator::Greater, 500.0.into()),
                ]
            )
        );
    }

    #[test]
    fn test_parse_in_list() {
        let ast = parse("customerTier IN ('vip','premium')").unwrap();
        let cond = leaf(&ast);
        assert_eq!(cond.field, "customerTier");
        assert_eq!(cond.operator, Operator::In);
        assert_eq!(
            cond.value,
            Literal::List(vec!["vip".into(), "premium".into()])
        );
    }

    #[test]
    fn test_parse_not_in_keeps_field_intact() {
        let ast = parse("driverLevel NOT IN (1, 2)").unwrap();
        let cond = leaf(&ast);
        assert_eq!(cond.field, "driverLevel");
        assert_eq!(cond.operator, Operator::NotIn);
        assert_eq!(cond.value, Literal::List(vec![1.0.into(), 2.0.into()]));
    }

    #[test]
    fn test_parse_all_operators() {
        let operators = [
            ("weight >= 5", Operator::GreaterEqual),
            ("weight <= 5", Operator::LessEqual),
            ("weight != 5", Operator::NotEqual),
            ("weight = 5", Operator::Equal),
            ("weight > 5", Operator::Greater),
            ("weight < 5", Operator::Less),
            ("channel IN ('web')", Operator::In),
            ("channel NOT IN ('web')", Operator::NotIn),
            ("channel STARTS_WITH 'we'", Operator::StartsWith),
            ("channel ENDS_WITH 'eb'", Operator::EndsWith),
            ("channel CONTAINS 'e'", Operator::Contains),
        ];

        for (cond_str, expected_op) in operators {
            let ast = parse(cond_str).unwrap();
            assert_eq!(leaf(&ast).operator, expected_op, "Failed for: {}", cond_str);
        }
    }

    #[test]
    fn test_parse_normalizes_whitespace() {
        let ast = parse("  weight \t>\n  1000 ").unwrap();
        assert_eq!(leaf(&ast).field, "weight");
    }

    #[test]
    fn test_and_is_split_before_or() {
        // a OR b AND c => (a OR b) AND c
        let ast = parse("weight > 1 OR volume > 2 AND channel = 'web'").unwrap();
        match ast {
            ConditionNode::Compound {
                combinator: Combinator::And,
                children,
            } => {
                assert_eq!(children.len(), 2);
                assert!(matches!(
                    children[0],
                    ConditionNode::Compound {
                        combinator: Combinator::Or,
                        ..
                    }
                ));
            }
            other => panic!("Expected AND at the root, got {:?}", other),
        }
    }

    #[test]
    fn test_three_way_and_is_flat() {
        let ast = parse("weight > 1 AND volume > 2 AND channel = 'web'").unwrap();
        match ast {
            ConditionNode::Compound { children, .. } => assert_eq!(children.len(), 3),
            other => panic!("Expected compound, got {:?}", other),
        }
    }

    #[test]
    fn test_grouping_parentheses() {
        let ast = parse("(weight > 1 OR volume > 2) AND channel = 'web'").unwrap();
        let fields: Vec<&str> = ast.leaves().iter().map(|l| l.field.as_str()).collect();
        assert_eq!(fields, vec!["weight", "volume", "channel"]);

        let ast = parse("( weight > 1 )").unwrap();
        assert_eq!(leaf(&ast).field, "weight");
    }

    #[test]
    fn test_keywords_inside_quotes_are_not_split() {
        let ast = parse("cargoType = 'SAND AND GRAVEL'").unwrap();
        assert_eq!(leaf(&ast).value, Literal::String("SAND AND GRAVEL".into()));

        let ast = parse("channel IN ('a,b', 'c')").unwrap();
        assert_eq!(
            leaf(&ast).value,
            Literal::List(vec!["a,b".into(), "c".into()])
        );
    }

    #[test]
    fn test_parse_value_literals() {
        assert_eq!(parse_value("\"x\"").unwrap(), Literal::String("x".into()));
        assert_eq!(parse_value("'x'").unwrap(), Literal::String("x".into()));
        assert_eq!(parse_value("-12.5").unwrap(), Literal::Number(-12.5));
        assert_eq!(parse_value("7.").unwrap(), Literal::Number(7.0));
        assert_eq!(parse_value("true").unwrap(), Literal::Boolean(true));
        assert_eq!(parse_value("false").unwrap(), Literal::Boolean(false));
        assert_eq!(parse_value("()").unwrap(), Literal::List(vec![]));
        assert_eq!(parse_value("fragile").unwrap(), Literal::String("fragile".into()));
        assert_eq!(parse_value(".5").unwrap(), Literal::String(".5".into()));
        assert_eq!(parse_value("'").unwrap(), Literal::String("'".into()));
    }

    #[test]
    fn test_non_ascii_digits_are_bare_words() {
        assert_eq!(parse_value("١٢٣").unwrap(), Literal::String("١٢٣".into()));
        let ast = parse("channel = ١٢٣").unwrap();
        assert_eq!(leaf(&ast).value, Literal::String("١٢٣".into()));
    }

    #[test]
    fn test_parse_errors() {
        for bad in [
            "",
            "   ",
            "weight",
            "weight >",
            "weight>1000",
            "weight > 1 AND AND volume < 2",
            "customerTier IN 'vip'",
            "weight = (1, 2)",
            "weight > (1",
            "pickup.city = 'Toronto",
            "1weight > 5",
            "pickup city = 'x'",
            "pickup..city = 'x'",
            "0.city = 'x'",
        ] {
            let err = parse(bad).unwrap_err();
            assert!(err.is_parse_error(), "Expected parse error for {:?}", bad);
        }
    }

    #[test]
    fn test_array_index_segments_in_field() {
        let ast = parse("stops.0.city = 'Ottawa'").unwrap();
        assert_eq!(leaf(&ast).field, "stops.0.city");
    }

    #[test]
    fn test_parse_error_carries_fragment() {
        match parse("weight > 1 AND volume").unwrap_err() {
            RuleEngineError::Parse { fragment, .. } => assert_eq!(fragment, "volume"),
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_mixed_combinator_detection() {
        assert!(has_ungrouped_mixed_combinators("a = 1 OR b = 2 AND c = 3"));
        assert!(!has_ungrouped_mixed_combinators("(a = 1 OR b = 2) AND c = 3"));
        assert!(!has_ungrouped_mixed_combinators("a = 1 AND b = 2 AND c = 3"));
        assert!(!has_ungrouped_mixed_combinators("a = 'x OR y' AND b = 2"));
        assert!(has_ungrouped_mixed_combinators("(a = 1 OR b = 2 AND c = 3)"));
    }
}
