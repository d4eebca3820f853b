//! Identifier scanning over raw expression text

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[a-zA-Z_][a-zA-Z0-9_.]*").expect("identifier pattern is valid"));

/// Keywords of the condition grammar itself
const GRAMMAR_KEYWORDS: [&str; 7] = ["AND", "OR", "NOT", "IN", "STARTS_WITH", "ENDS_WITH", "CONTAINS"];

#[inline]
pub fn is_grammar_keyword(token: &str) -> bool {
    GRAMMAR_KEYWORDS.contains(&token)
}

/// Identifier-like tokens outside quoted string literals, in source order
pub fn identifiers(expression: &str) -> Vec<&str> {
    let quoted = quoted_spans(expression);
    IDENTIFIER
        .find_iter(expression)
        .filter(|m| !quoted.iter().any(|span| span.contains(&m.start())))
        .map(|m| m.as_str())
        .collect()
}

/// Byte ranges covered by quoted literals, quotes included
///
/// An unterminated quote runs to the end of the text.
fn quoted_spans(expression: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut open: Option<(usize, u8)> = None;

    for (i, &b) in expression.as_bytes().iter().enumerate() {
        match open {
            Some((start, q)) if b == q => {
                spans.push(start..i + 1);
                open = None;
            }
            Some(_) => {}
            None if b == b'\'' || b == b'"' => open = Some((i, b)),
            None => {}
        }
    }

    if let Some((start, _)) = open {
        spans.push(start..expression.len());
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers_skip_quoted_text() {
        assert_eq!(
            identifiers("pickup.city = 'Toronto' AND weight > 500"),
            vec!["pickup.city", "AND", "weight"]
        );
        assert_eq!(identifiers(r#"cargoType = "dry goods""#), vec!["cargoType"]);
    }

    #[test]
    fn test_identifiers_ignore_numbers() {
        assert_eq!(identifiers("weight > 1000.5 AND volume < 2e3"), vec!["weight", "AND", "volume"]);
    }

    #[test]
    fn test_unterminated_quote_masks_the_rest() {
        assert_eq!(identifiers("channel = 'web AND secret"), vec!["channel"]);
    }

    #[test]
    fn test_grammar_keywords() {
        assert!(is_grammar_keyword("NOT"));
        assert!(is_grammar_keyword("STARTS_WITH"));
        assert!(!is_grammar_keyword("and"));
    }
}
