//! Shared output formatting for lint results.

use anyhow::Result;
use codesniff_core::LintResult;
use std::io::{self, Write};

use crate::OutputFormat;

/// Print lint results in the specified format.
pub fn print(result: &LintResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Compact => write_compact(result, &mut io::stdout().lock())?,
        OutputFormat::Json => return print_json(result),
    }
    Ok(())
}

fn write_compact(result: &LintResult, out: &mut impl Write) -> io::Result<()> {
    for violation in &result.violations {
        writeln!(out, "{violation}")?;
        if let Some(suggestion) = &violation.suggestion {
            writeln!(out, "  = help: {}", suggestion.message)?;
        }
    }

    let (errors, warnings) = result.count_by_severity();
    writeln!(
        out,
        "Found {errors} error(s), {warnings} warning(s) in {} file(s)",
        result.files_checked
    )
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}
