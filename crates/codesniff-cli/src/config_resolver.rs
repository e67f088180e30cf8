//! Configuration file resolution.
//!
//! Resolves the configuration file path in priority order:
//!
//! 1. `--config` flag (explicit path)
//! 2. `{project}/codesniff.toml` or `.codesniff.toml`
//! 3. No config found → defaults

use anyhow::{Context, Result};
use codesniff_core::Config;
use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly specified via `--config` flag.
    Explicit(PathBuf),
    /// Found in the project directory.
    Project(PathBuf),
    /// No config found; defaults will be used.
    Default,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Loads the configuration this source points at.
    pub fn load(&self) -> Result<Config> {
        match self.path() {
            Some(p) => {
                tracing::debug!("Loading config: {}", p.display());
                Config::from_file(p)
                    .with_context(|| format!("Failed to load config: {}", p.display()))
            }
            None => Ok(Config::default()),
        }
    }
}

/// Project-level config file names, checked in order.
const PROJECT_CONFIG_NAMES: &[&str] = &["codesniff.toml", ".codesniff.toml"];

/// Resolves the configuration file path.
///
/// See module-level docs for resolution order.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    for name in PROJECT_CONFIG_NAMES {
        let candidate = project_dir.join(name);
        if candidate.is_file() {
            tracing::debug!("Found project config: {}", candidate.display());
            return ConfigSource::Project(candidate);
        }
    }

    ConfigSource::Default
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn explicit_takes_priority_over_project() {
        let tmp = TempDir::new().expect("tempdir");
        fs::write(tmp.path().join("codesniff.toml"), "").expect("write");
        let explicit = tmp.path().join("custom.toml");

        let result = resolve(tmp.path(), Some(&explicit));
        assert_eq!(result, ConfigSource::Explicit(explicit));
    }

    #[test]
    fn plain_name_preferred_over_dot_prefix() {
        let tmp = TempDir::new().expect("tempdir");
        fs::write(tmp.path().join("codesniff.toml"), "").expect("write");
        fs::write(tmp.path().join(".codesniff.toml"), "").expect("write");

        let result = resolve(tmp.path(), None);
        assert_eq!(
            result,
            ConfigSource::Project(tmp.path().join("codesniff.toml"))
        );
    }

    #[test]
    fn dot_prefixed_config_found() {
        let tmp = TempDir::new().expect("tempdir");
        fs::write(tmp.path().join(".codesniff.toml"), "").expect("write");

        let result = resolve(tmp.path(), None);
        assert_eq!(
            result,
            ConfigSource::Project(tmp.path().join(".codesniff.toml"))
        );
    }

    #[test]
    fn no_config_loads_defaults() {
        let tmp = TempDir::new().expect("tempdir");
        let source = resolve(tmp.path(), None);
        assert_eq!(source, ConfigSource::Default);

        let config = source.load().expect("defaults");
        assert!(config.rules.is_empty());
    }

    #[test]
    fn missing_explicit_config_fails_to_load() {
        let source = ConfigSource::Explicit(PathBuf::from("/nonexistent/codesniff.toml"));
        let err = source.load().expect_err("missing file");
        assert!(err.to_string().contains("Failed to load config"));
    }
}
