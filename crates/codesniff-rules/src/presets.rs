//! Rule presets for common configurations.

use std::str::FromStr;

use codesniff_core::{Config, RuleBox, Severity};

use crate::error::RuleConfigError;
use crate::{
    array_bracket_spacing, closing_declaration_comment, forbidden_functions, opening_brace,
    ArrayBracketSpacing, ClosingDeclarationComment, ForbiddenFunctions, OpeningBrace,
    SeverityChoice,
};

/// Preset configurations for codesniff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Preset {
    /// Every rule with its default settings.
    #[default]
    Standard,
    /// Case-sensitive comments, braces checked on functions, `die` is an error.
    Strict,
    /// For gradual adoption: placement-only brace check, longer blocks
    /// before a closing comment is required, no bracket spacing rule.
    Lenient,
}

impl FromStr for Preset {
    type Err = RuleConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            _ => Err(RuleConfigError::UnknownPreset(s.to_string())),
        }
    }
}

impl Preset {
    /// Returns the rules for this preset with default options.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        let mut rules: Vec<RuleBox> = vec![
            Box::new(self.closing_comment()),
            Box::new(self.opening_brace()),
            Box::new(self.die_function()),
            Box::new(ForbiddenFunctions::extract_function()),
            Box::new(ForbiddenFunctions::new()),
        ];
        if self.checks_bracket_spacing() {
            rules.push(Box::new(ArrayBracketSpacing::new()));
        }
        rules
    }

    /// Returns the rules for this preset with options from `config` applied.
    ///
    /// # Errors
    ///
    /// Returns an error if a rule option is invalid.
    pub fn configured(self, config: &Config) -> Result<Vec<RuleBox>, RuleConfigError> {
        let shared = config.forbidden_severity();
        let mut rules: Vec<RuleBox> = vec![
            Box::new(
                self.closing_comment()
                    .configure(&config.rule(closing_declaration_comment::NAME))?,
            ),
            Box::new(
                self.opening_brace()
                    .configure(&config.rule(opening_brace::NAME))?,
            ),
            Box::new(self.die_function().shared_severity(shared)),
            Box::new(ForbiddenFunctions::extract_function().shared_severity(shared)),
            Box::new(
                ForbiddenFunctions::configured(&config.rule(forbidden_functions::NAME))?
                    .shared_severity(shared),
            ),
        ];
        if self.checks_bracket_spacing() {
            rules.push(Box::new(ArrayBracketSpacing::new()));
        }
        Ok(rules)
    }

    fn closing_comment(self) -> ClosingDeclarationComment {
        match self {
            Self::Standard => ClosingDeclarationComment::new(),
            Self::Strict => ClosingDeclarationComment::new().case_sensitive(true),
            Self::Lenient => ClosingDeclarationComment::new().min_lines(20),
        }
    }

    fn opening_brace(self) -> OpeningBrace {
        match self {
            Self::Standard => OpeningBrace::new(),
            Self::Strict => OpeningBrace::new().include_functions(true),
            Self::Lenient => OpeningBrace::line_only(),
        }
    }

    fn die_function(self) -> ForbiddenFunctions {
        match self {
            Self::Strict => ForbiddenFunctions::die_function()
                .severity(SeverityChoice::Fixed(Severity::Error)),
            Self::Standard | Self::Lenient => ForbiddenFunctions::die_function(),
        }
    }

    fn checks_bracket_spacing(self) -> bool {
        self != Self::Lenient
    }
}

/// Builds the rules selected by `config.preset` (default: standard) with the
/// configured rule options.
///
/// # Errors
///
/// Returns an error for an unknown preset or an invalid rule option.
pub fn configured_rules(config: &Config) -> Result<Vec<RuleBox>, RuleConfigError> {
    let preset = match config.preset.as_deref() {
        Some(name) => name.parse()?,
        None => Preset::default(),
    };
    tracing::debug!("Using preset {preset:?}");
    preset.configured(config)
}

/// Returns every available rule with default settings.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    Preset::Standard.rules()
}

/// Names of every available rule, in dispatch order.
pub const RULE_NAMES: &[&str] = &[
    closing_declaration_comment::NAME,
    opening_brace::NAME,
    forbidden_functions::DIE_FUNCTION,
    forbidden_functions::EXTRACT_FUNCTION,
    forbidden_functions::NAME,
    array_bracket_spacing::NAME,
];
