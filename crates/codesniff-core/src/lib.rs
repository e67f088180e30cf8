//! # codesniff-core
//!
//! Core framework for token-stream style checking.
//!
//! The tokenizer and scope matcher live outside this crate: it consumes a
//! [`TokenStream`] with scope and grouping links already resolved, routes each
//! token to the rules registered for its kind, and collects [`Violation`]s.
//!
//! - [`TokenStream`] and [`Token`] for the validated, read-only input
//! - navigation queries on [`TokenStream`] (`find_previous`, `find_next`,
//!   `flatten_range`, ...)
//! - [`Rule`] trait for token-triggered rules
//! - [`RuleRegistry`] and [`Analyzer`] for dispatch
//! - [`Violation`] and [`LintResult`] for findings
//!
//! ## Example
//!
//! ```ignore
//! use codesniff_core::{Analyzer, FileContext, TokenStream};
//!
//! let stream: TokenStream = serde_json::from_str(&dump)?;
//! let analyzer = Analyzer::builder().rule(MyRule::new()).build()?;
//! let violations = analyzer.check(&FileContext::new(path, &stream));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod dispatch;
mod navigation;
mod rule;
mod token;
mod types;

/// PHP-subset tokenizer for writing rule tests as source snippets.
#[cfg(any(test, feature = "fixtures"))]
pub mod fixture;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::FileContext;
pub use dispatch::RuleRegistry;
pub use navigation::{MethodProperties, Visibility};
pub use rule::{Rule, RuleBox};
pub use token::{StreamError, Token, TokenKind, TokenStream};
pub use types::{
    format_message, LintResult, Location, Severity, Suggestion, Violation, ViolationDiagnostic,
};
