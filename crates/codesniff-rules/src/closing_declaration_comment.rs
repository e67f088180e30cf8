//! Rule requiring a trailing `//end ...` comment on long blocks.
//!
//! # Rationale
//!
//! In long functions, classes and control structures the closing brace is
//! far away from the keyword that opened it. A trailing comment naming the
//! block makes the structure readable without scrolling back.
//!
//! # Detected Patterns
//!
//! - Blocks of `min_lines` or more without a trailing comment (warning `Missing`)
//! - Trailing comments that name the wrong block (error `Incorrect`)
//! - Colon syntax control structures such as `if (...):` (error `ColonSyntax`)
//! - `while` loops with neither braces nor a `;` tail (warning `MissingBrace`)
//! - Abstract methods with a body, and non-abstract methods without one
//!   (warning `Abstract`)
//!
//! # Accepted Comments
//!
//! ```php
//! }//end if
//! } // end foreach
//! }//end myFunction
//! }//end function
//! }//end class
//! } while ($a);//end do
//! ```
//!
//! # Configuration
//!
//! - `min_lines`: Block span (keyword line to closing brace line) from which
//!   a comment is required (default: 10)
//! - `case_sensitive`: Compare comments exactly instead of case-insensitively
//!   (default: false)
//! - `allow_spaced`: Also accept `// end ...` (default: true)

use codesniff_core::{FileContext, Rule, RuleConfig, Severity, TokenKind, Violation};
use tracing::debug;

use crate::error::{bool_option, usize_option, RuleConfigError};

/// Rule name for closing-declaration-comment.
pub const NAME: &str = "closing-declaration-comment";

/// Default number of lines from which a trailing comment is required.
pub const DEFAULT_MIN_LINES: usize = 10;

const REGISTERED: &[TokenKind] = &[
    TokenKind::Function,
    TokenKind::Class,
    TokenKind::Interface,
    TokenKind::If,
    TokenKind::ElseIf,
    TokenKind::Else,
    TokenKind::For,
    TokenKind::Foreach,
    TokenKind::While,
    TokenKind::Do,
    TokenKind::Switch,
];

/// Requires `//end <block>` comments after the closing brace of long blocks.
#[derive(Debug, Clone)]
pub struct ClosingDeclarationComment {
    /// Minimum block span that requires a comment.
    pub min_lines: usize,
    /// Whether comment matching is case-sensitive.
    pub case_sensitive: bool,
    /// Whether `// end ...` is accepted alongside `//end ...`.
    pub allow_spaced: bool,
}

impl Default for ClosingDeclarationComment {
    fn default() -> Self {
        Self::new()
    }
}

impl ClosingDeclarationComment {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_lines: DEFAULT_MIN_LINES,
            case_sensitive: false,
            allow_spaced: true,
        }
    }

    /// Sets the minimum block span.
    #[must_use]
    pub fn min_lines(mut self, lines: usize) -> Self {
        self.min_lines = lines;
        self
    }

    /// Sets whether comments are compared case-sensitively.
    #[must_use]
    pub fn case_sensitive(mut self, sensitive: bool) -> Self {
        self.case_sensitive = sensitive;
        self
    }

    /// Sets whether the spaced `// end` form is accepted.
    #[must_use]
    pub fn allow_spaced(mut self, allow: bool) -> Self {
        self.allow_spaced = allow;
        self
    }

    /// Applies options from a `[rules.closing-declaration-comment]` table.
    ///
    /// # Errors
    ///
    /// Returns an error if an option has the wrong type.
    pub fn configure(mut self, config: &RuleConfig) -> Result<Self, RuleConfigError> {
        if let Some(lines) = usize_option(config, NAME, "min_lines")? {
            self.min_lines = lines;
        }
        if let Some(sensitive) = bool_option(config, NAME, "case_sensitive")? {
            self.case_sensitive = sensitive;
        }
        if let Some(allow) = bool_option(config, NAME, "allow_spaced")? {
            self.allow_spaced = allow;
        }
        Ok(self)
    }

    /// Acceptable spellings, primary first.
    fn spellings(&self, label: &str, name: Option<&str>, kind: TokenKind) -> Vec<String> {
        let mut subjects = vec![label.to_string()];
        if let Some(name) = name {
            // The declared name is what gets suggested for functions.
            if kind == TokenKind::Function {
                subjects.insert(0, name.to_string());
            } else {
                subjects.push(name.to_string());
            }
        }

        let mut spellings: Vec<String> = subjects.iter().map(|s| format!("//end {s}")).collect();
        if self.allow_spaced {
            spellings.extend(subjects.iter().map(|s| format!("// end {s}")));
        }
        spellings
    }

    fn matches(&self, comment: &str, spellings: &[String]) -> bool {
        let comment = comment.trim();
        if self.case_sensitive {
            spellings.iter().any(|s| s == comment)
        } else {
            let comment = comment.to_lowercase();
            spellings.iter().any(|s| s.to_lowercase() == comment)
        }
    }

    /// Checks a function for body anomalies. Returns `Some` when processing
    /// should stop.
    fn check_function(ctx: &FileContext<'_>, index: usize) -> Option<Vec<Violation>> {
        let props = ctx.tokens.method_properties(index);
        if props.is_closure {
            debug!("{NAME}: skipping closure at token {index}");
            return Some(Vec::new());
        }
        if ctx.tokens.has_condition(index, TokenKind::Interface) {
            debug!("{NAME}: skipping interface method at token {index}");
            return Some(Vec::new());
        }

        let has_body = ctx.token(index).scope_closer.is_some();
        let message = match (props.is_abstract, has_body) {
            (true, false) => return Some(Vec::new()),
            (true, true) => "Possible parse error: abstract method defined with a body",
            (false, false) => "Possible parse error: non-abstract method defined as abstract",
            (false, true) => return None,
        };
        Some(vec![Violation::new(
            "Abstract",
            NAME,
            Severity::Warning,
            ctx.location(index),
            message,
        )])
    }

    /// Diagnoses a keyword that owns no brace pair.
    fn check_braceless(ctx: &FileContext<'_>, index: usize) -> Vec<Violation> {
        let token = ctx.token(index);
        let after = token.grouping_closer.unwrap_or(index) + 1;
        let next = ctx.tokens.next_significant(after).map(|i| ctx.token(i).kind);

        if next == Some(TokenKind::Colon) {
            return vec![Violation::templated(
                "ColonSyntax",
                NAME,
                Severity::Error,
                ctx.location(index),
                "Colon syntax control structures are not allowed",
                vec![token.text.clone()],
            )];
        }
        if token.kind == TokenKind::While && next != Some(TokenKind::Semicolon) {
            return vec![Violation::templated(
                "MissingBrace",
                NAME,
                Severity::Warning,
                ctx.location(index),
                "Possible parse error: %s missing opening or closing brace",
                vec![token.text.clone()],
            )];
        }
        debug!("{NAME}: single-statement {} at token {index}", token.text);
        Vec::new()
    }

    /// Token after which the trailing comment is expected.
    fn comment_anchor(ctx: &FileContext<'_>, kind: TokenKind, closer: usize) -> usize {
        if kind != TokenKind::Do {
            return closer;
        }
        let tokens = ctx.tokens;
        tokens
            .next_significant(closer + 1)
            .filter(|&w| tokens[w].kind == TokenKind::While)
            .and_then(|w| tokens[w].grouping_closer)
            .and_then(|paren| tokens.next_significant(paren + 1))
            .filter(|&semi| tokens[semi].kind == TokenKind::Semicolon)
            .unwrap_or(closer)
    }

    /// Comment directly after `anchor`, or after one whitespace token.
    fn trailing_comment(ctx: &FileContext<'_>, anchor: usize) -> Option<usize> {
        let tokens = ctx.tokens;
        let mut slot = anchor + 1;
        if tokens.get(slot)?.kind == TokenKind::Whitespace {
            slot += 1;
        }
        let comment = tokens.get(slot)?;
        (comment.kind == TokenKind::Comment).then_some(slot)
    }
}

impl Rule for ClosingDeclarationComment {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Requires //end comments after the closing brace of long blocks"
    }

    fn register(&self) -> &[TokenKind] {
        REGISTERED
    }

    fn process(&self, ctx: &FileContext<'_>, index: usize) -> Vec<Violation> {
        let token = ctx.token(index);

        if token.kind == TokenKind::Function {
            if let Some(violations) = Self::check_function(ctx, index) {
                return violations;
            }
        }

        let Some(closer) = token.scope_closer else {
            return Self::check_braceless(ctx, index);
        };

        if ctx.token(closer).line.saturating_sub(token.line) < self.min_lines {
            return Vec::new();
        }

        let label = token.text.to_lowercase();
        let spellings = self.spellings(&label, ctx.tokens.declaration_name(index), token.kind);
        let anchor = Self::comment_anchor(ctx, token.kind, closer);

        let (code, severity) = match Self::trailing_comment(ctx, anchor) {
            None => ("Missing", Severity::Warning),
            Some(comment) if self.matches(&ctx.token(comment).text, &spellings) => {
                return Vec::new();
            }
            Some(_) => ("Incorrect", Severity::Error),
        };

        vec![Violation::templated(
            code,
            NAME,
            severity,
            ctx.location(anchor),
            "Expected %s",
            vec![spellings[0].clone()],
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codesniff_core::fixture::tokenize;
    use codesniff_core::Analyzer;
    use std::path::Path;

    fn check_code(rule: ClosingDeclarationComment, code: &str) -> Vec<Violation> {
        let stream = tokenize(code).expect("Failed to tokenize");
        let analyzer = Analyzer::builder().rule(rule).build().expect("analyzer");
        analyzer.check(&FileContext::new(Path::new("test.php"), &stream))
    }

    fn body(lines: usize) -> String {
        "    $a = 1;\n".repeat(lines)
    }

    fn long_function(trailer: &str) -> String {
        format!("function myFunc()\n{{\n{}}}{trailer}\n", body(10))
    }

    fn long_if(trailer: &str) -> String {
        format!("if ($a) {{\n{}}}{trailer}\n", body(10))
    }

    fn codes(violations: &[Violation]) -> Vec<&str> {
        violations.iter().map(|v| v.code.as_str()).collect()
    }

    #[test]
    fn test_short_block_is_exempt() {
        let violations = check_code(ClosingDeclarationComment::new(), "if ($a) {\n    $b = 1;\n}\n");
        assert!(violations.is_empty());
    }

    #[test]
    fn test_accepts_function_spellings() {
        for trailer in ["//end myFunc", "// end myFunc", "//end function", " //end myFunc"] {
            let violations = check_code(ClosingDeclarationComment::new(), &long_function(trailer));
            assert!(violations.is_empty(), "rejected {trailer:?}: {violations:?}");
        }
    }

    #[test]
    fn test_wrong_name_is_incorrect() {
        let violations =
            check_code(ClosingDeclarationComment::new(), &long_function("//end wrongName"));
        assert_eq!(codes(&violations), vec!["Incorrect"]);
        assert_eq!(violations[0].severity, Severity::Error);
        assert_eq!(violations[0].message, "Expected //end myFunc");
    }

    #[test]
    fn test_missing_comment_warns_at_closer() {
        let code = long_function("");
        let violations = check_code(ClosingDeclarationComment::new(), &code);
        assert_eq!(codes(&violations), vec!["Missing"]);
        assert_eq!(violations[0].severity, Severity::Warning);
        assert_eq!(violations[0].data, vec!["//end myFunc".to_string()]);
        assert_eq!(violations[0].location.line, 13);
    }

    #[test]
    fn test_comment_on_next_line_is_checked() {
        let rule = ClosingDeclarationComment::new();
        assert!(check_code(rule, &long_if("\n//end if")).is_empty());

        let violations = check_code(ClosingDeclarationComment::new(), &long_if("\n//end else"));
        assert_eq!(codes(&violations), vec!["Incorrect"]);
    }

    #[test]
    fn test_comment_after_blank_line_is_missing() {
        let violations = check_code(ClosingDeclarationComment::new(), &long_if("\n\n//end if"));
        assert_eq!(codes(&violations), vec!["Missing"]);
    }

    #[test]
    fn test_closer_at_end_of_stream_is_missing() {
        let code = format!("if ($a) {{\n{}}}", body(10));
        let violations = check_code(ClosingDeclarationComment::new(), &code);
        assert_eq!(codes(&violations), vec!["Missing"]);
    }

    #[test]
    fn test_abstract_method_with_body_warns() {
        let code = format!(
            "abstract class Base\n{{\n    abstract function run()\n    {{\n{}    }}//end run\n}}//end class\n",
            body(10)
        );
        let violations = check_code(ClosingDeclarationComment::new(), &code);
        assert_eq!(codes(&violations), vec!["Abstract"]);
    }

    #[test]
    fn test_abstract_declaration_is_skipped() {
        let violations = check_code(
            ClosingDeclarationComment::new(),
            "abstract class Base\n{\n    abstract public function run();\n}\n",
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_bodyless_function_warns() {
        let violations = check_code(ClosingDeclarationComment::new(), "function run();\n");
        assert_eq!(codes(&violations), vec!["Abstract"]);
        assert_eq!(
            violations[0].message,
            "Possible parse error: non-abstract method defined as abstract"
        );
    }

    #[test]
    fn test_interface_method_is_skipped() {
        let violations = check_code(
            ClosingDeclarationComment::new(),
            "interface Runner\n{\n    public function run();\n}\n",
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_closure_is_skipped() {
        let code = format!("$f = function ($x) {{\n{}}};\n", body(12));
        let violations = check_code(ClosingDeclarationComment::new(), &code);
        assert!(violations.is_empty());
    }

    #[test]
    fn test_colon_syntax_is_an_error() {
        let violations = check_code(
            ClosingDeclarationComment::new(),
            "if ($a):\n    $b = 1;\nendif;\n",
        );
        assert_eq!(codes(&violations), vec!["ColonSyntax"]);
        assert_eq!(violations[0].severity, Severity::Error);
        assert_eq!(violations[0].data, vec!["if".to_string()]);
    }

    #[test]
    fn test_braceless_while_warns() {
        let violations =
            check_code(ClosingDeclarationComment::new(), "while ($a)\n    $a--;\n");
        assert_eq!(codes(&violations), vec!["MissingBrace"]);
        assert_eq!(
            violations[0].message,
            "Possible parse error: while missing opening or closing brace"
        );
    }

    #[test]
    fn test_braceless_if_is_silent() {
        let violations = check_code(ClosingDeclarationComment::new(), "if ($a)\n    $b = 1;\n");
        assert!(violations.is_empty());
    }

    #[test]
    fn test_do_while_comment_follows_tail() {
        let ok = format!("do {{\n{}}} while ($a);//end do\n", body(10));
        assert!(check_code(ClosingDeclarationComment::new(), &ok).is_empty());

        let missing = format!("do {{\n{}}} while ($a);\n", body(10));
        let violations = check_code(ClosingDeclarationComment::new(), &missing);
        assert_eq!(codes(&violations), vec!["Missing"]);
        assert_eq!(violations[0].message, "Expected //end do");
    }

    #[test]
    fn test_case_handling() {
        assert!(check_code(ClosingDeclarationComment::new(), &long_if("//END IF")).is_empty());
        assert!(check_code(ClosingDeclarationComment::new(), &long_if("// end if")).is_empty());

        let strict = ClosingDeclarationComment::new().case_sensitive(true);
        let violations = check_code(strict, &long_if("//END IF"));
        assert_eq!(codes(&violations), vec!["Incorrect"]);
    }

    #[test]
    fn test_spaced_form_can_be_disabled() {
        let rule = ClosingDeclarationComment::new().allow_spaced(false);
        let violations = check_code(rule, &long_if("// end if"));
        assert_eq!(codes(&violations), vec!["Incorrect"]);
    }

    #[test]
    fn test_min_lines_threshold() {
        let rule = ClosingDeclarationComment::new().min_lines(20);
        assert!(check_code(rule, &long_if("")).is_empty());
    }

    #[test]
    fn test_class_accepts_label_or_name() {
        for trailer in ["//end class", "//end Widget"] {
            let code = format!("class Widget\n{{\n{}}}{trailer}\n", body(10));
            let violations = check_code(ClosingDeclarationComment::new(), &code);
            assert!(violations.is_empty(), "rejected {trailer:?}");
        }
    }

    #[test]
    fn test_configure_reads_options() {
        let config = codesniff_core::Config::parse(
            "[rules.closing-declaration-comment]\nmin_lines = 3\ncase_sensitive = true\nallow_spaced = false\n",
        )
        .expect("config");
        let rule = ClosingDeclarationComment::new()
            .configure(&config.rule(NAME))
            .expect("valid options");
        assert_eq!(rule.min_lines, 3);
        assert!(rule.case_sensitive);
        assert!(!rule.allow_spaced);
    }
}
