//! Integration test: presets end-to-end via Analyzer.
//!
//! Tokenizes the PHP fixtures under `tests/fixtures/` and checks them with
//! the rules each preset builds from configuration.

use codesniff_core::fixture::tokenize;
use codesniff_core::{Analyzer, Config, FileContext, LintResult, Severity, TokenStream};
use codesniff_rules::configured_rules;
use std::path::Path;

const REPORT: &str = include_str!("fixtures/report.php");
const CLEAN: &str = include_str!("fixtures/clean.php");

fn analyzer(toml: &str) -> Analyzer {
    let config = Config::parse(toml).expect("config should parse");
    let rules = configured_rules(&config).expect("rules should build");
    Analyzer::builder()
        .rules(rules)
        .config(config)
        .build()
        .expect("analyzer should build")
}

fn stream(source: &str) -> TokenStream {
    tokenize(source).expect("fixture should tokenize")
}

fn run(analyzer: &Analyzer, sources: &[(&str, &TokenStream)]) -> LintResult {
    let files: Vec<FileContext<'_>> = sources
        .iter()
        .map(|(path, tokens)| FileContext::new(Path::new(path), tokens))
        .collect();
    analyzer.analyze(&files)
}

fn summary(result: &LintResult) -> Vec<(String, usize, Severity)> {
    result
        .violations
        .iter()
        .map(|v| (v.qualified_code(), v.location.line, v.severity))
        .collect()
}

// ── Standard preset ──

#[test]
fn standard_preset_reports_in_token_order() {
    let report = stream(REPORT);
    let result = run(&analyzer(""), &[("report.php", &report)]);

    assert_eq!(
        summary(&result),
        vec![
            ("closing-declaration-comment.Missing".to_string(), 12, Severity::Warning),
            ("opening-brace-placement.BraceOnSameLine".to_string(), 6, Severity::Error),
            ("extract-function.Found".to_string(), 7, Severity::Error),
            ("array-bracket-spacing.SpaceBeforeBracket".to_string(), 9, Severity::Error),
            ("die-function.Found".to_string(), 10, Severity::Warning),
        ]
    );
    assert!(result.has_errors());
    assert_eq!(result.count_by_severity(), (3, 2));
}

#[test]
fn clean_file_passes_every_preset() {
    let clean = stream(CLEAN);
    for preset in ["standard", "strict", "lenient"] {
        let toml = format!("preset = \"{preset}\"\n");
        let result = run(&analyzer(&toml), &[("clean.php", &clean)]);
        assert!(
            result.violations.is_empty(),
            "{preset}: {:#?}",
            result.violations
        );
    }
}

#[test]
fn files_keep_input_order() {
    let report = stream(REPORT);
    let clean = stream(CLEAN);
    let result = run(
        &analyzer("[analyzer]\nparallelism = 2\n"),
        &[("report.php", &report), ("clean.php", &clean), ("again.php", &report)],
    );

    assert_eq!(result.files_checked, 3);
    let files: Vec<&Path> = result
        .violations
        .iter()
        .map(|v| v.location.file.as_path())
        .collect();
    assert_eq!(files.len(), 10);
    assert!(files[..5].iter().all(|f| *f == Path::new("report.php")));
    assert!(files[5..].iter().all(|f| *f == Path::new("again.php")));
}

#[test]
fn repeated_analysis_is_identical() {
    let report = stream(REPORT);
    let analyzer = analyzer("");
    let first = run(&analyzer, &[("report.php", &report)]);
    let second = run(&analyzer, &[("report.php", &report)]);
    assert_eq!(first.violations, second.violations);
}

// ── Other presets ──

#[test]
fn strict_preset_escalates_die() {
    let report = stream(REPORT);
    let result = run(&analyzer("preset = \"strict\"\n"), &[("report.php", &report)]);

    let die = result
        .violations
        .iter()
        .find(|v| v.rule == "die-function")
        .expect("die violation");
    assert_eq!(die.severity, Severity::Error);
    assert_eq!(result.violations.len(), 5);
}

#[test]
fn lenient_preset_relaxes_checks() {
    let report = stream(REPORT);
    let result = run(&analyzer("preset = \"lenient\"\n"), &[("report.php", &report)]);

    let rules: Vec<&str> = result.violations.iter().map(|v| v.rule.as_str()).collect();
    assert_eq!(
        rules,
        vec!["opening-brace-placement", "extract-function", "die-function"]
    );
}

// ── Configuration ──

#[test]
fn config_disables_and_overrides_rules() {
    let toml = r#"
fail_on = "warning"

[rules.array-bracket-spacing]
enabled = false

[rules.opening-brace-placement]
enabled = false

[rules.closing-declaration-comment]
severity = "error"
min_lines = 5
"#;
    let report = stream(REPORT);
    let analyzer = analyzer(toml);
    let result = run(&analyzer, &[("report.php", &report)]);

    assert_eq!(
        summary(&result),
        vec![
            ("closing-declaration-comment.Missing".to_string(), 12, Severity::Error),
            ("closing-declaration-comment.Missing".to_string(), 11, Severity::Error),
            ("extract-function.Found".to_string(), 7, Severity::Error),
            ("die-function.Found".to_string(), 10, Severity::Warning),
        ]
    );
    assert!(result.has_violations_at(analyzer.config().fail_on()));
}

#[test]
fn shared_toggle_downgrades_forbidden_functions() {
    let toml = r#"
forbidden_as_error = false

[rules.forbidden-functions]
functions = { extract = "explicit keys" }
"#;
    let report = stream(REPORT);
    let result = run(&analyzer(toml), &[("report.php", &report)]);

    let found: Vec<(&str, Severity)> = result
        .violations
        .iter()
        .filter(|v| v.code == "Found")
        .map(|v| (v.rule.as_str(), v.severity))
        .collect();
    assert_eq!(
        found,
        vec![
            ("extract-function", Severity::Error),
            ("forbidden-functions", Severity::Warning),
            ("die-function", Severity::Warning),
        ]
    );
}
