//! codesniff CLI tool.
//!
//! Checks token dumps produced by an external PHP tokenizer. Each dump is a
//! JSON array of tokens with scope and grouping links resolved.
//!
//! Usage:
//! ```bash
//! codesniff check [OPTIONS] <DUMP>...
//! codesniff list-rules
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Token-stream style checker for PHP
#[derive(Parser)]
#[command(name = "codesniff")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "CODESNIFF_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check token dumps
    Check {
        /// Token dump files (JSON)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "compact")]
        format: OutputFormat,

        /// Only run specific rules (comma-separated)
        #[arg(long)]
        rules: Option<String>,
    },

    /// List available rules
    ListRules,
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// One line per violation.
    #[default]
    Compact,
    /// JSON output.
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            files,
            format,
            rules,
        } => {
            let cwd = std::env::current_dir()?;
            let source = config_resolver::resolve(&cwd, cli.config.as_deref());
            commands::check::run(&files, format, rules, &source)
        }
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(())
        }
    }
}
