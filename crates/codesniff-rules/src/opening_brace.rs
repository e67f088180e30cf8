//! Rule placing opening braces of blocks on their own line.
//!
//! # Rationale
//!
//! Braces on their own line, aligned with the start of the statement that
//! owns them, keep block boundaries visible in long control structures.
//!
//! # Detected Patterns
//!
//! - `if ($a) {` with the brace on the condition's line (`BraceOnSameLine`)
//! - A brace on its own line but indented differently from the line that
//!   starts the statement (`BraceIndent`)
//!
//! ```php
//! if ($a)
//! {
//!     run();
//! } else
//! {
//!     stop();
//! }
//! ```
//!
//! # Configuration
//!
//! - `check_indent`: Also compare brace indentation (default: true)
//! - `include_functions`: Check named function declarations too (default: false)

use codesniff_core::{FileContext, Rule, RuleConfig, Severity, TokenKind, Violation};
use tracing::debug;

use crate::error::{bool_option, RuleConfigError};

/// Rule name for opening-brace-placement.
pub const NAME: &str = "opening-brace-placement";

const WITH_FUNCTIONS: &[TokenKind] = &[
    TokenKind::If,
    TokenKind::Else,
    TokenKind::ElseIf,
    TokenKind::For,
    TokenKind::Foreach,
    TokenKind::While,
    TokenKind::Do,
    TokenKind::Switch,
    TokenKind::Function,
];

/// Requires the opening brace of a block on the line after its statement.
#[derive(Debug, Clone)]
pub struct OpeningBrace {
    /// Whether brace indentation is checked.
    pub check_indent: bool,
    /// Whether named functions are checked.
    pub include_functions: bool,
}

impl Default for OpeningBrace {
    fn default() -> Self {
        Self::new()
    }
}

impl OpeningBrace {
    /// Creates the full check: line placement and indentation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            check_indent: true,
            include_functions: false,
        }
    }

    /// Creates a check of line placement only.
    #[must_use]
    pub fn line_only() -> Self {
        Self {
            check_indent: false,
            ..Self::new()
        }
    }

    /// Sets whether named function declarations are checked.
    #[must_use]
    pub fn include_functions(mut self, include: bool) -> Self {
        self.include_functions = include;
        self
    }

    /// Applies options from a `[rules.opening-brace-placement]` table.
    ///
    /// # Errors
    ///
    /// Returns an error if an option is not a boolean.
    pub fn configure(mut self, config: &RuleConfig) -> Result<Self, RuleConfigError> {
        if let Some(check) = bool_option(config, NAME, "check_indent")? {
            self.check_indent = check;
        }
        if let Some(include) = bool_option(config, NAME, "include_functions")? {
            self.include_functions = include;
        }
        Ok(self)
    }
}

impl Rule for OpeningBrace {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Requires opening braces on a new line, aligned with their statement"
    }

    fn register(&self) -> &[TokenKind] {
        if self.include_functions {
            WITH_FUNCTIONS
        } else {
            TokenKind::CONTROL_STRUCTURES
        }
    }

    fn process(&self, ctx: &FileContext<'_>, index: usize) -> Vec<Violation> {
        let token = ctx.token(index);
        let Some(brace) = token.scope_opener else {
            return Vec::new();
        };
        if token.kind == TokenKind::Function && ctx.tokens.method_properties(index).is_closure {
            debug!("{NAME}: skipping closure at token {index}");
            return Vec::new();
        }

        // Multi-line conditions anchor on the closing parenthesis.
        let anchor_line = token
            .grouping_closer
            .map_or(token.line, |close| ctx.token(close).line);
        let brace_token = ctx.token(brace);

        if brace_token.line == anchor_line {
            return vec![Violation::new(
                "BraceOnSameLine",
                NAME,
                Severity::Error,
                ctx.location(brace),
                "Opening brace should be on a new line",
            )];
        }

        if !self.check_indent {
            return Vec::new();
        }

        let start = ctx.tokens.line_start(index).unwrap_or(index);
        let expected = ctx.token(start).column;
        if brace_token.column == expected {
            return Vec::new();
        }

        vec![Violation::templated(
            "BraceIndent",
            NAME,
            Severity::Error,
            ctx.location(brace),
            "Opening brace indented incorrectly; expected %s spaces, found %s",
            vec![
                expected.saturating_sub(1).to_string(),
                brace_token.column.saturating_sub(1).to_string(),
            ],
        )]
    }
}
