//! Settings
//!
//! Optional YAML configuration. Lookup order:
//! 1. An explicit `--config` path
//! 2. `hortela.yaml` next to the ledger file
//! 3. Built-in defaults
//!
//! ```yaml
//! precision: 2
//! color: true
//! fail_fast: false
//! include_void: false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name looked up next to the ledger.
pub const CONFIG_FILE_NAME: &str = "hortela.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{}': {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config '{}': {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("precision must be between 0 and 8, got {0}")]
    Precision(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Decimal places shown in reports
    pub precision: u32,

    /// Colored diagnostics and report headers
    pub color: bool,

    /// Stop validating at the first failing validator
    pub fail_fast: bool,

    /// Show the internal void account in reports
    pub include_void: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            precision: 2,
            color: true,
            fail_fast: false,
            include_void: false,
        }
    }
}

impl Settings {
    /// Loads settings from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let settings: Settings =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        settings.validate()?;
        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Resolves settings for a ledger file.
    ///
    /// An explicit path must exist; the implicit `hortela.yaml` is optional.
    pub fn resolve(explicit: Option<&Path>, ledger_path: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidate = ledger_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(CONFIG_FILE_NAME);

        if candidate.is_file() {
            return Self::load(candidate);
        }

        debug!("No {} found, using default settings", CONFIG_FILE_NAME);
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.precision > crate::ledger::money::SCALE_DIGITS {
            return Err(ConfigError::Precision(self.precision));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.precision, 2);
        assert!(settings.color);
        assert!(!settings.fail_fast);
        assert!(!settings.include_void);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let settings: Settings = serde_yaml::from_str("precision: 4\n").unwrap();
        assert_eq!(settings.precision, 4);
        assert!(settings.color);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("hortela.yaml");
        fs::write(&path, "precison: 3\n").unwrap();

        assert!(matches!(Settings::load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_precision_out_of_range() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("hortela.yaml");
        fs::write(&path, "precision: 9\n").unwrap();

        assert!(matches!(Settings::load(&path), Err(ConfigError::Precision(9))));
    }

    #[test]
    fn test_resolve_finds_file_next_to_ledger() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "fail_fast: true\ncolor: false\n").unwrap();

        let ledger_path = temp_dir.path().join("books.hta");
        let settings = Settings::resolve(None, &ledger_path).unwrap();

        assert!(settings.fail_fast);
        assert!(!settings.color);
    }

    #[test]
    fn test_resolve_without_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let ledger_path = temp_dir.path().join("books.hta");

        assert_eq!(Settings::resolve(None, &ledger_path).unwrap(), Settings::default());
    }

    #[test]
    fn test_resolve_explicit_missing_file_fails() {
        let ledger_path = Path::new("books.hta");
        let result = Settings::resolve(Some(Path::new("/nonexistent/hortela.yaml")), ledger_path);

        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
