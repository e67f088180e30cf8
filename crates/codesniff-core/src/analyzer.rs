//! Core analyzer for orchestrating rule execution.

use crate::config::Config;
use crate::context::FileContext;
use crate::dispatch::RuleRegistry;
use crate::rule::{Rule, RuleBox};
use crate::types::{LintResult, Violation};

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while setting up an analyzer.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// The worker pool could not be created.
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    rules: Vec<RuleBox>,
    config: Option<Config>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds several boxed rules, keeping their order.
    #[must_use]
    pub fn rules<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = RuleBox>,
    {
        self.rules.extend(rules);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the analyzer and its dispatch registry.
    ///
    /// # Errors
    ///
    /// Returns an error if a dedicated worker pool was requested and could
    /// not be created.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();
        let registry = RuleRegistry::build(&self.rules, &config);

        let pool = match config.analyzer.parallelism {
            Some(threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()?,
            ),
            None => None,
        };

        Ok(Analyzer {
            rules: self.rules,
            registry,
            config,
            pool,
        })
    }
}

/// The main analyzer that walks token streams and dispatches rules.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    rules: Vec<RuleBox>,
    registry: RuleRegistry,
    config: Config,
    pool: Option<rayon::ThreadPool>,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the configuration the analyzer was built with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Checks a single file, returning violations in token order.
    ///
    /// Each token is offered to the rules registered for its kind, in
    /// registration order.
    #[must_use]
    pub fn check(&self, ctx: &FileContext<'_>) -> Vec<Violation> {
        debug!("Checking: {}", ctx.path.display());

        let mut violations = Vec::new();
        for (index, token) in ctx.tokens.iter().enumerate() {
            for &id in self.registry.rules_for(token.kind) {
                let rule = &self.rules[id];
                let found = rule.process(ctx, index);
                violations.extend(self.apply_severity_override(rule.name(), found));
            }
        }
        violations
    }

    /// Checks many files in parallel and returns the combined result.
    ///
    /// Violations keep the order of `files`, then token order within a file.
    #[must_use]
    pub fn analyze(&self, files: &[FileContext<'_>]) -> LintResult {
        info!("Checking {} file(s) with {} rule(s)", files.len(), self.rule_count());

        let run = || -> Vec<Vec<Violation>> { files.par_iter().map(|ctx| self.check(ctx)).collect() };
        let per_file = match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        };

        let mut result = LintResult::new();
        for violations in per_file {
            result.violations.extend(violations);
            result.files_checked += 1;
        }

        info!(
            "Check complete: {} violations in {} files",
            result.violations.len(),
            result.files_checked
        );

        result
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_override(
        &self,
        rule_name: &str,
        mut violations: Vec<Violation>,
    ) -> Vec<Violation> {
        if let Some(severity) = self.config.rule_severity(rule_name) {
            for v in &mut violations {
                v.severity = severity;
            }
        }
        violations
    }
}
