//! Rule forbidding whitespace between a value and its index bracket.
//!
//! # Detected Patterns
//!
//! - `$list [0]`, `$row ['id']`
//! - `get_rows() [0]`, `$matrix[1] [2]`
//!
//! Short array literals such as `$a = [1, 2]` are not index accesses and
//! are ignored.

use codesniff_core::{FileContext, Rule, Severity, TokenKind, Violation};

/// Rule name for array-bracket-spacing.
pub const NAME: &str = "array-bracket-spacing";

/// Kinds that can be indexed by a following `[`.
const INDEXABLE: &[TokenKind] = &[
    TokenKind::Variable,
    TokenKind::Identifier,
    TokenKind::CloseParenthesis,
    TokenKind::CloseSquareBracket,
    TokenKind::CloseCurlyBracket,
];

/// Forbids space before the `[` of an array access.
#[derive(Debug, Clone, Default)]
pub struct ArrayBracketSpacing;

impl ArrayBracketSpacing {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for ArrayBracketSpacing {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Forbids whitespace before the bracket of an array access"
    }

    fn register(&self) -> &[TokenKind] {
        &[TokenKind::OpenSquareBracket]
    }

    fn process(&self, ctx: &FileContext<'_>, index: usize) -> Vec<Violation> {
        let tokens = ctx.tokens;
        let Some(before) = index.checked_sub(1) else {
            return Vec::new();
        };
        if !tokens[before].is_empty() {
            return Vec::new();
        }
        let Some(value) = tokens.previous_significant(before) else {
            return Vec::new();
        };
        if !INDEXABLE.contains(&tokens[value].kind) {
            return Vec::new();
        }

        let expected = format!("{}{}", tokens[value].text, ctx.token(index).text);
        let found = tokens.flatten_range(value, index);
        vec![Violation::templated(
            "SpaceBeforeBracket",
            NAME,
            Severity::Error,
            ctx.location(index),
            "Space found before square bracket; expected \"%s\" but found \"%s\"",
            vec![expected, found],
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codesniff_core::fixture::tokenize;
    use codesniff_core::Analyzer;
    use std::path::Path;

    fn check_code(code: &str) -> Vec<Violation> {
        let stream = tokenize(code).expect("Failed to tokenize");
        let analyzer = Analyzer::builder()
            .rule(ArrayBracketSpacing::new())
            .build()
            .expect("analyzer");
        analyzer.check(&FileContext::new(Path::new("test.php"), &stream))
    }

    #[test]
    fn test_space_before_index() {
        let violations = check_code("$x = $foo  ['a'];\n");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, "SpaceBeforeBracket");
        assert_eq!(
            violations[0].data,
            vec!["$foo[".to_string(), "$foo  [".to_string()]
        );
        insta::assert_snapshot!(
            violations[0].message,
            @r#"Space found before square bracket; expected "$foo[" but found "$foo  [""#
        );
    }

    #[test]
    fn test_adjacent_bracket_passes() {
        assert!(check_code("$x = $foo['a'][0];\n").is_empty());
    }

    #[test]
    fn test_chained_and_call_results() {
        let violations = check_code("$x = rows() [0];\n$y = $m[1] [2];\n");
        let found: Vec<&str> = violations.iter().map(|v| v.data[1].as_str()).collect();
        assert_eq!(found, vec![") [", "] ["]);
    }

    #[test]
    fn test_short_array_literal_is_ignored() {
        assert!(check_code("$x = [1, 2];\n$y = array(1, [2]);\nfoo( [3]);\n").is_empty());
    }
}
