//! Rule trait for defining token-triggered style rules.

use crate::context::FileContext;
use crate::token::TokenKind;
use crate::types::{Severity, Violation};

/// A style rule invoked for the token kinds it registers.
///
/// Rules are constructed once per run and shared across files and threads,
/// so `process` must not keep per-file state.
///
/// # Example
///
/// ```ignore
/// use codesniff_core::{FileContext, Rule, Severity, TokenKind, Violation};
///
/// pub struct NoGoto;
///
/// impl Rule for NoGoto {
///     fn name(&self) -> &'static str { "no-goto" }
///
///     fn register(&self) -> &[TokenKind] { &[TokenKind::Identifier] }
///
///     fn process(&self, ctx: &FileContext<'_>, index: usize) -> Vec<Violation> {
///         if !ctx.token(index).text.eq_ignore_ascii_case("goto") {
///             return Vec::new();
///         }
///         vec![Violation::new(
///             "Found",
///             self.name(),
///             self.default_severity(),
///             ctx.location(index),
///             "goto is not allowed",
///         )]
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "opening-brace-placement").
    fn name(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Token kinds this rule wants to be invoked for.
    fn register(&self) -> &[TokenKind];

    /// Checks the token at `index` and returns any violations found.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The file being checked
    /// * `index` - Position of a token whose kind this rule registered
    fn process(&self, ctx: &FileContext<'_>, index: usize) -> Vec<Violation>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
