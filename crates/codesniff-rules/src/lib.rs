//! # codesniff-rules
//!
//! Built-in style rules for codesniff.
//!
//! ## Available Rules
//!
//! | Name | Codes | Description |
//! |------|-------|-------------|
//! | `closing-declaration-comment` | `Missing`, `Incorrect`, `ColonSyntax`, `MissingBrace`, `Abstract` | Requires `//end ...` comments after long blocks |
//! | `opening-brace-placement` | `BraceOnSameLine`, `BraceIndent` | Requires opening braces on their own, aligned line |
//! | `die-function` | `Found` | Forbids `die` and `exit` |
//! | `extract-function` | `Found` | Forbids `extract()` |
//! | `forbidden-functions` | `Found` | Forbids a configurable list of functions |
//! | `array-bracket-spacing` | `SpaceBeforeBracket` | Forbids space before an index bracket |
//!
//! ## Usage
//!
//! ```ignore
//! use codesniff_core::{Analyzer, Config};
//! use codesniff_rules::configured_rules;
//!
//! let config = Config::from_file("codesniff.toml".as_ref())?;
//! let analyzer = Analyzer::builder()
//!     .rules(configured_rules(&config)?)
//!     .config(config)
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod array_bracket_spacing;
mod closing_declaration_comment;
mod error;
mod forbidden_functions;
mod opening_brace;
mod presets;

pub use array_bracket_spacing::ArrayBracketSpacing;
pub use closing_declaration_comment::{ClosingDeclarationComment, DEFAULT_MIN_LINES};
pub use error::RuleConfigError;
pub use forbidden_functions::{ForbiddenFunctions, MatchMode, SeverityChoice};
pub use opening_brace::OpeningBrace;
pub use presets::{all_rules, configured_rules, Preset, RULE_NAMES};

/// Re-export core types for convenience.
pub use codesniff_core::{Rule, Severity, Violation};
