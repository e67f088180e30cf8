//! Token-kind to rule routing.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::config::Config;
use crate::rule::RuleBox;
use crate::token::TokenKind;

/// Maps each token kind to the rules registered for it, in registration order.
///
/// Built once from static rule declarations; disabled rules are left out.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    by_kind: HashMap<TokenKind, Vec<usize>>,
}

impl RuleRegistry {
    /// Builds the registry for `rules`, honoring `enabled` flags in `config`.
    #[must_use]
    pub fn build(rules: &[RuleBox], config: &Config) -> Self {
        let mut by_kind: HashMap<TokenKind, Vec<usize>> = HashMap::new();

        for (id, rule) in rules.iter().enumerate() {
            if !config.is_rule_enabled(rule.name()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }

            let kinds = rule.register();
            if kinds.is_empty() {
                warn!("Rule {} registers no token kinds", rule.name());
                continue;
            }

            for kind in kinds {
                let ids = by_kind.entry(*kind).or_default();
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }

        Self { by_kind }
    }

    /// Rule ids registered for `kind`, in registration order.
    #[must_use]
    pub fn rules_for(&self, kind: TokenKind) -> &[usize] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns true if no rule is registered for any kind.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_kind.is_empty()
    }
}
