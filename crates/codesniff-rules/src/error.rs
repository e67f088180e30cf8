//! Errors raised while constructing rules from configuration.

use codesniff_core::RuleConfig;
use thiserror::Error;

/// Configuration problems detected when building rules.
#[derive(Debug, Error)]
pub enum RuleConfigError {
    /// The configured preset name is not known.
    #[error("Unknown preset `{0}` (expected standard, strict or lenient)")]
    UnknownPreset(String),

    /// A rule option has the wrong type or value.
    #[error("Invalid option `{option}` for rule {rule}: {message}")]
    InvalidOption {
        /// Rule name.
        rule: &'static str,
        /// Option key.
        option: &'static str,
        /// What was wrong.
        message: String,
    },

    /// A forbidden-function pattern is not a valid regular expression.
    #[error("Invalid pattern `{pattern}` in rule {rule}: {source}")]
    Pattern {
        /// Rule name.
        rule: &'static str,
        /// The offending pattern.
        pattern: String,
        /// Regex compilation error.
        source: regex::Error,
    },
}

/// Reads a non-negative integer option, if present.
pub(crate) fn usize_option(
    config: &RuleConfig,
    rule: &'static str,
    option: &'static str,
) -> Result<Option<usize>, RuleConfigError> {
    let Some(value) = config.options.get(option) else {
        return Ok(None);
    };
    value
        .as_integer()
        .and_then(|n| usize::try_from(n).ok())
        .map(Some)
        .ok_or_else(|| RuleConfigError::InvalidOption {
            rule,
            option,
            message: format!("expected a non-negative integer, got {value}"),
        })
}

/// Reads a boolean option, if present.
pub(crate) fn bool_option(
    config: &RuleConfig,
    rule: &'static str,
    option: &'static str,
) -> Result<Option<bool>, RuleConfigError> {
    let Some(value) = config.options.get(option) else {
        return Ok(None);
    };
    value
        .as_bool()
        .map(Some)
        .ok_or_else(|| RuleConfigError::InvalidOption {
            rule,
            option,
            message: format!("expected true or false, got {value}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use codesniff_core::Config;

    fn rule_config(toml: &str) -> RuleConfig {
        Config::parse(toml).expect("config").rule("sample")
    }

    #[test]
    fn reads_present_and_absent_options() {
        let config = rule_config("[rules.sample]\nmin_lines = 4\nstrict = true\n");
        assert_eq!(usize_option(&config, "sample", "min_lines").ok(), Some(Some(4)));
        assert_eq!(bool_option(&config, "sample", "strict").ok(), Some(Some(true)));
        assert_eq!(bool_option(&config, "sample", "missing").ok(), Some(None));
    }

    #[test]
    fn rejects_wrong_types() {
        let config = rule_config("[rules.sample]\nmin_lines = -3\nstrict = \"yes\"\n");
        let err = usize_option(&config, "sample", "min_lines").expect_err("negative");
        assert!(err.to_string().contains("non-negative integer, got -3"));
        assert!(matches!(
            bool_option(&config, "sample", "strict"),
            Err(RuleConfigError::InvalidOption {
                option: "strict",
                ..
            })
        ));
    }
}
