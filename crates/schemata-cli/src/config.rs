//! Configuration management for the CLI
//!
//! This module handles loading and merging configuration from:
//! - Default values
//! - Configuration files (YAML/JSON)
//! - Environment variables (via the `--config`/`SCHEMATA_CONFIG` path and
//!   the logging overrides)

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use crate::logging::{LogFormat, LoggingConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Schema settings applied when a format document leaves them out
    pub schema: SchemaConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingSection,
}

/// Defaults for response formats
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Schema name used when the document has none
    pub default_name: Option<String>,

    /// Strictness used when the document does not set it
    pub strict: Option<bool>,
}

impl SchemaConfig {
    /// Effective strictness (off unless configured)
    pub fn strict(&self) -> bool {
        self.strict.unwrap_or(false)
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Use colored output by default
    pub color: Option<bool>,

    /// Result format when `--output` is not given
    pub format: Option<OutputFormat>,
}

impl OutputConfig {
    /// Effective color setting (on unless configured)
    pub fn color(&self) -> bool {
        self.color.unwrap_or(true)
    }
}

/// Logging settings as written in a config file
///
/// Every field is optional so a later file only overrides what it names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub format: Option<LogFormat>,
    pub thread_ids: Option<bool>,
    pub source_location: Option<bool>,
}

impl LoggingSection {
    /// Fill unset fields from the logging defaults
    pub fn to_logging_config(&self) -> LoggingConfig {
        let defaults = LoggingConfig::default();
        LoggingConfig {
            level: self.level.clone().unwrap_or(defaults.level),
            format: self.format.unwrap_or(defaults.format),
            thread_ids: self.thread_ids.unwrap_or(defaults.thread_ids),
            source_location: self.source_location.unwrap_or(defaults.source_location),
        }
    }

    fn merge(&mut self, other: LoggingSection) {
        if other.level.is_some() {
            self.level = other.level;
        }
        if other.format.is_some() {
            self.format = other.format;
        }
        if other.thread_ids.is_some() {
            self.thread_ids = other.thread_ids;
        }
        if other.source_location.is_some() {
            self.source_location = other.source_location;
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let config = if is_yaml(path) {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load default locations, then layer an explicit file on top
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        let mut config = Self::load()?;
        if let Some(path) = file {
            config.merge(Self::from_file(path)?);
        }
        Ok(config)
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".schemata.yaml"),
            PathBuf::from(".schemata.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let schemata_dir = config_dir.join("schemata");
            paths.push(schemata_dir.join("config.yaml"));
            paths.push(schemata_dir.join("config.json"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".schemata.yaml"));
        }

        paths
    }

    /// Merge with another config (fields the other sets take precedence)
    pub fn merge(&mut self, other: Config) {
        if other.schema.default_name.is_some() {
            self.schema.default_name = other.schema.default_name;
        }
        if other.schema.strict.is_some() {
            self.schema.strict = other.schema.strict;
        }
        if other.output.color.is_some() {
            self.output.color = other.output.color;
        }
        if other.output.format.is_some() {
            self.output.format = other.output.format;
        }
        self.logging.merge(other.logging);
    }
}

/// Check whether a path names a YAML document
pub fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_yaml_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "schema:\n  default_name: quick_plan\n  strict: true\nlogging:\n  level: debug\n  format: json\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.schema.default_name.as_deref(), Some("quick_plan"));
        assert!(config.schema.strict());
        assert_eq!(config.logging.to_logging_config().level, "debug");
        assert_eq!(config.logging.to_logging_config().format, LogFormat::Json);
        assert!(config.output.color());
    }

    #[test]
    fn test_load_json_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"output": {"color": false, "format": "yaml"}}"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert!(!config.output.color());
        assert_eq!(config.output.format, Some(OutputFormat::Yaml));
        assert!(!config.schema.strict());
        assert_eq!(config.logging.to_logging_config().level, "warn");
    }

    #[test]
    fn test_missing_config_file() {
        let err = Config::from_file(Path::new("/nonexistent/schemata.yaml")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_merge_keeps_unset_name() {
        let mut base = Config::default();
        base.schema.default_name = Some("plan".to_string());

        let mut other = Config::default();
        other.schema.strict = Some(true);

        base.merge(other);
        assert_eq!(base.schema.default_name.as_deref(), Some("plan"));
        assert!(base.schema.strict());
    }

    #[test]
    fn test_explicit_file_only_overrides_what_it_sets() {
        let dir = tempdir().unwrap();
        let base_path = dir.path().join("base.yaml");
        fs::write(
            &base_path,
            "schema:\n  strict: true\noutput:\n  color: false\nlogging:\n  level: debug\n",
        )
        .unwrap();
        let override_path = dir.path().join("override.json");
        fs::write(&override_path, r#"{"schema": {"default_name": "plan"}}"#).unwrap();

        let mut config = Config::from_file(&base_path).unwrap();
        config.merge(Config::from_file(&override_path).unwrap());

        assert_eq!(config.schema.default_name.as_deref(), Some("plan"));
        assert!(config.schema.strict());
        assert!(!config.output.color());
        assert_eq!(config.logging.to_logging_config().level, "debug");
    }

    #[test]
    fn test_override_can_turn_settings_off() {
        let mut base = Config::default();
        base.schema.strict = Some(true);
        base.logging.level = Some("debug".to_string());

        let mut other = Config::default();
        other.schema.strict = Some(false);
        other.logging.level = Some("error".to_string());

        base.merge(other);
        assert!(!base.schema.strict());
        assert_eq!(base.logging.to_logging_config().level, "error");
    }
}
