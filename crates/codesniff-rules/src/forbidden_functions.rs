//! Rules forbidding calls to listed functions and language constructs.
//!
//! # Rationale
//!
//! Some calls have no place in the codebase: `die`/`exit` end the request
//! without a proper response, `extract` injects variables nobody declared.
//! Each entry may name an alternative, which is appended to the message and
//! attached as a suggestion.
//!
//! # Rules
//!
//! | Name | Table | Severity |
//! |------|-------|----------|
//! | `die-function` | `die`, `exit` | warning |
//! | `extract-function` | `extract` | error |
//! | `forbidden-functions` | configurable | shared `forbidden_as_error` toggle |
//!
//! # Detected Patterns
//!
//! - `extract($row);`, `\extract($row);`
//! - `die;`, `exit(1);`, `DIE('x');`
//!
//! Method calls (`$obj->extract()`), static calls, declarations and
//! instantiations with a listed name are ignored.
//!
//! # Configuration
//!
//! ```toml
//! [rules.forbidden-functions]
//! pattern_match = false
//! functions = { create_function = "closures", eval = "" }
//! ```
//!
//! An empty alternative means the call is forbidden outright. With
//! `pattern_match`, every key is a case-insensitive regular expression that
//! must match the whole name.

use std::collections::{BTreeMap, HashMap};

use codesniff_core::{FileContext, Rule, RuleConfig, Severity, Suggestion, TokenKind, Violation};
use regex::Regex;
use tracing::debug;

use crate::error::{bool_option, RuleConfigError};

/// Rule name for the configurable table.
pub const NAME: &str = "forbidden-functions";

/// Rule name for `die`/`exit`.
pub const DIE_FUNCTION: &str = "die-function";

/// Rule name for `extract`.
pub const EXTRACT_FUNCTION: &str = "extract-function";

const REGISTERED: &[TokenKind] = &[TokenKind::Identifier, TokenKind::Exit];

/// Tokens after which an identifier is not a plain function call.
const NOT_A_CALL_AFTER: &[TokenKind] = &[
    TokenKind::ObjectOperator,
    TokenKind::DoubleColon,
    TokenKind::Function,
    TokenKind::New,
    TokenKind::Class,
    TokenKind::Interface,
];

/// How table keys are compared with call names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Case-insensitive equality.
    Exact,
    /// Anchored, case-insensitive regular expressions.
    Pattern,
}

/// Where a rule's severity comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityChoice {
    /// Always this severity.
    Fixed(Severity),
    /// The configuration's shared `forbidden_as_error` toggle.
    Shared,
}

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    alternative: Option<String>,
}

#[derive(Debug, Clone)]
enum Matcher {
    Exact(HashMap<String, usize>),
    Pattern(Vec<Regex>),
}

/// Flags calls to names in a forbidden table.
#[derive(Debug, Clone)]
pub struct ForbiddenFunctions {
    name: &'static str,
    description: &'static str,
    lead: &'static str,
    entries: Vec<Entry>,
    matcher: Matcher,
    severity: SeverityChoice,
    shared: Severity,
}

impl Default for ForbiddenFunctions {
    fn default() -> Self {
        Self::new()
    }
}

impl ForbiddenFunctions {
    /// Creates the configurable rule with its default table.
    #[must_use]
    pub fn new() -> Self {
        Self::exact(
            NAME,
            "The use of function %s() is forbidden.",
            [("sizeof", Some("count()")), ("delete", Some("unset()"))],
        )
        .describe("Forbids calls to configured functions")
    }

    /// Flags `die` and `exit`, always as a warning.
    #[must_use]
    pub fn die_function() -> Self {
        let graceful = "wp_die(), wp_send_json_error(), or wp_send_json_success()";
        Self::exact(
            DIE_FUNCTION,
            "Terminating the request with %s is not allowed.",
            [("die", Some(graceful)), ("exit", Some(graceful))],
        )
        .describe("Forbids die and exit in favour of a proper response")
        .severity(SeverityChoice::Fixed(Severity::Warning))
    }

    /// Flags `extract`, always as an error.
    #[must_use]
    pub fn extract_function() -> Self {
        Self::exact(
            EXTRACT_FUNCTION,
            "The use of %s() hides where variables come from.",
            [(
                "extract",
                Some("separate assignments or access the array directly"),
            )],
        )
        .describe("Forbids extract() in favour of explicit field access")
        .severity(SeverityChoice::Fixed(Severity::Error))
    }

    /// Creates a rule comparing names case-insensitively.
    ///
    /// `lead` is the message template; its `%s` receives the matched name.
    #[must_use]
    pub fn exact<I, K, V>(name: &'static str, lead: &'static str, table: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let entries = normalize(table, true);
        let lookup = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.name.clone(), i))
            .collect();
        Self::assemble(name, lead, entries, Matcher::Exact(lookup))
    }

    /// Creates a rule whose table keys are regular expressions.
    ///
    /// # Errors
    ///
    /// Returns an error if a key does not compile.
    pub fn pattern<I, K, V>(
        name: &'static str,
        lead: &'static str,
        table: I,
    ) -> Result<Self, RuleConfigError>
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let entries = normalize(table, false);
        let patterns = entries
            .iter()
            .map(|e| {
                Regex::new(&format!("(?i)^(?:{})$", e.name)).map_err(|source| {
                    RuleConfigError::Pattern {
                        rule: name,
                        pattern: e.name.clone(),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::assemble(name, lead, entries, Matcher::Pattern(patterns)))
    }

    /// Builds the configurable rule from a `[rules.forbidden-functions]` table.
    ///
    /// A `functions` table replaces the default one.
    ///
    /// # Errors
    ///
    /// Returns an error for mistyped options or patterns that do not compile.
    pub fn configured(config: &RuleConfig) -> Result<Self, RuleConfigError> {
        let defaults = Self::new();
        let pattern_match = bool_option(config, NAME, "pattern_match")?.unwrap_or(false);

        let table: Vec<(String, Option<String>)> = match config.options.get("functions") {
            None => defaults
                .entries
                .iter()
                .map(|e| (e.name.clone(), e.alternative.clone()))
                .collect(),
            Some(_) => config
                .get_option::<BTreeMap<String, String>>("functions")
                .ok_or_else(|| RuleConfigError::InvalidOption {
                    rule: NAME,
                    option: "functions",
                    message: "expected a table of name = \"alternative\" strings".to_string(),
                })?
                .into_iter()
                .map(|(name, alt)| (name, Some(alt)))
                .collect(),
        };

        let rule = if pattern_match {
            Self::pattern(NAME, defaults.lead, table)?
        } else {
            Self::exact(NAME, defaults.lead, table)
        };
        Ok(rule.describe(defaults.description))
    }

    /// Sets where the severity comes from.
    #[must_use]
    pub fn severity(mut self, choice: SeverityChoice) -> Self {
        self.severity = choice;
        self
    }

    /// Sets the value of the shared toggle, used with [`SeverityChoice::Shared`].
    #[must_use]
    pub fn shared_severity(mut self, severity: Severity) -> Self {
        self.shared = severity;
        self
    }

    /// Returns how names are matched.
    #[must_use]
    pub fn mode(&self) -> MatchMode {
        match self.matcher {
            Matcher::Exact(_) => MatchMode::Exact,
            Matcher::Pattern(_) => MatchMode::Pattern,
        }
    }

    /// Effective severity of this rule's violations.
    #[must_use]
    pub fn effective_severity(&self) -> Severity {
        match self.severity {
            SeverityChoice::Fixed(severity) => severity,
            SeverityChoice::Shared => self.shared,
        }
    }

    fn assemble(
        name: &'static str,
        lead: &'static str,
        entries: Vec<Entry>,
        matcher: Matcher,
    ) -> Self {
        debug!("{name}: {} forbidden name(s)", entries.len());
        Self {
            name,
            description: "",
            lead,
            entries,
            matcher,
            severity: SeverityChoice::Shared,
            shared: Severity::Error,
        }
    }

    fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    fn find(&self, text: &str) -> Option<&Entry> {
        let index = match &self.matcher {
            Matcher::Exact(lookup) => lookup.get(&text.to_lowercase()).copied(),
            Matcher::Pattern(patterns) => patterns.iter().position(|p| p.is_match(text)),
        };
        index.map(|i| &self.entries[i])
    }

    /// Returns true if the identifier at `index` is a plain function call.
    fn is_call(ctx: &FileContext<'_>, index: usize) -> bool {
        let tokens = ctx.tokens;
        let opens_call = tokens
            .next_significant(index + 1)
            .is_some_and(|next| tokens[next].kind == TokenKind::OpenParenthesis);
        if !opens_call {
            return false;
        }

        let Some(prev) = index.checked_sub(1).and_then(|i| tokens.previous_significant(i)) else {
            return true;
        };
        let prev = &tokens[prev];
        let declares_constant =
            prev.kind == TokenKind::Identifier && prev.text.eq_ignore_ascii_case("const");
        !NOT_A_CALL_AFTER.contains(&prev.kind) && !declares_constant
    }
}

/// Deduplicates names, lowercasing them for exact lookup, and drops empty
/// alternatives.
fn normalize<I, K, V>(table: I, lowercase: bool) -> Vec<Entry>
where
    I: IntoIterator<Item = (K, Option<V>)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut entries: Vec<Entry> = Vec::new();
    for (name, alternative) in table {
        let name = if lowercase {
            name.as_ref().to_lowercase()
        } else {
            name.as_ref().to_string()
        };
        let alternative = alternative.map(Into::into).filter(|a| !a.is_empty());
        match entries.iter_mut().find(|e| e.name == name) {
            Some(existing) => existing.alternative = alternative,
            None => entries.push(Entry { name, alternative }),
        }
    }
    entries
}

impl Rule for ForbiddenFunctions {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn default_severity(&self) -> Severity {
        self.effective_severity()
    }

    fn register(&self) -> &[TokenKind] {
        REGISTERED
    }

    fn process(&self, ctx: &FileContext<'_>, index: usize) -> Vec<Violation> {
        let token = ctx.token(index);
        if token.kind == TokenKind::Identifier && !Self::is_call(ctx, index) {
            return Vec::new();
        }
        let Some(entry) = self.find(&token.text) else {
            return Vec::new();
        };

        let mut template = self.lead.to_string();
        if let Some(alternative) = &entry.alternative {
            template.push_str(&format!(" Use {alternative} instead."));
        }

        let violation = Violation::templated(
            "Found",
            self.name,
            self.effective_severity(),
            ctx.location(index),
            &template,
            vec![token.text.clone()],
        );
        let violation = match &entry.alternative {
            Some(alternative) => violation.with_suggestion(Suggestion::new(format!(
                "Use {alternative} instead"
            ))),
            None => violation,
        };
        vec![violation]
    }
}
