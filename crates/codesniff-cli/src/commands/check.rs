//! Check command implementation.

use anyhow::{Context, Result};
use codesniff_core::{Analyzer, FileContext, RuleBox, TokenStream};
use codesniff_rules::{configured_rules, RULE_NAMES};
use std::path::{Path, PathBuf};

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the check command.
pub fn run(
    files: &[PathBuf],
    format: OutputFormat,
    rules_filter: Option<String>,
    source: &ConfigSource,
) -> Result<()> {
    let config = source.load()?;
    let fail_on = config.fail_on();

    let mut rules = configured_rules(&config).context("Invalid rule configuration")?;
    if let Some(filter) = rules_filter {
        let names: Vec<&str> = filter.split(',').map(str::trim).collect();
        rules = filter_rules(rules, &names);
    }

    let analyzer = Analyzer::builder()
        .rules(rules)
        .config(config)
        .build()
        .context("Failed to build analyzer")?;

    let streams = files
        .iter()
        .map(|path| read_stream(path))
        .collect::<Result<Vec<_>>>()?;
    let contexts: Vec<FileContext<'_>> = files
        .iter()
        .zip(&streams)
        .map(|(path, stream)| FileContext::new(path, stream))
        .collect();

    let result = analyzer.analyze(&contexts);

    super::output::print(&result, format)?;

    // Exit with error code once the configured threshold is reached
    if result.has_violations_at(fail_on) {
        std::process::exit(1);
    }

    Ok(())
}

/// Reads and validates one token dump.
fn read_stream(path: &Path) -> Result<TokenStream> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read token dump: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid token dump: {}", path.display()))
}

/// Keeps the rules named in `names`, in their configured order.
fn filter_rules(rules: Vec<RuleBox>, names: &[&str]) -> Vec<RuleBox> {
    for name in names {
        if !RULE_NAMES.contains(name) {
            tracing::warn!("Unknown rule: {}", name);
        }
    }
    rules
        .into_iter()
        .filter(|rule| names.contains(&rule.name()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use codesniff_core::fixture::tokenize;
    use codesniff_rules::all_rules;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn reads_dump_written_by_serde() {
        let tmp = TempDir::new().expect("tempdir");
        let stream = tokenize("if ($a) {\n}\n").expect("tokenize");
        let path = tmp.path().join("dump.json");
        fs::write(&path, serde_json::to_string(&stream).expect("serialize")).expect("write");

        let read = read_stream(&path).expect("valid dump");
        assert_eq!(read.as_slice(), stream.as_slice());
    }

    #[test]
    fn rejects_dump_with_broken_links() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("broken.json");
        let dump = r#"[{"kind":"open_curly_bracket","text":"{","line":1,"column":1,"scope_opener":0,"scope_closer":7}]"#;
        fs::write(&path, dump).expect("write");

        let err = read_stream(&path).expect_err("invalid links");
        assert!(err.to_string().contains("Invalid token dump"));
    }

    #[test]
    fn rejects_dump_with_zero_column() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("zero.json");
        let dump = r#"[{"kind":"if","text":"if","line":1,"column":0}]"#;
        fs::write(&path, dump).expect("write");

        let err = read_stream(&path).expect_err("zero column");
        assert!(err.to_string().contains("Invalid token dump"));
        assert!(format!("{err:#}").contains("zero line or column"));
    }

    #[test]
    fn missing_dump_is_reported() {
        let err = read_stream(Path::new("/nonexistent/dump.json")).expect_err("missing");
        assert!(err.to_string().contains("Failed to read token dump"));
    }

    #[test]
    fn filter_keeps_named_rules_in_order() {
        let rules = filter_rules(
            all_rules(),
            &["array-bracket-spacing", "no-such-rule", "die-function"],
        );
        let names: Vec<&str> = rules.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["die-function", "array-bracket-spacing"]);
    }
}
