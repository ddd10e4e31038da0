//! Configuration for the view layer
//!
//! Sources in order of precedence:
//! 1. Environment variables
//! 2. The file named by `RUNMAT_MX_CONFIG` (YAML, JSON or TOML)
//! 3. Built-in defaults

use anyhow::{Context, Result};
use log::{debug, info};
use once_cell::sync::{Lazy, OnceCell};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "RUNMAT_MX_CONFIG";

/// Longest field name the host accepts.
pub const DEFAULT_MAX_NAME_LENGTH: usize = 63;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MxConfig {
    #[serde(default)]
    pub naming: NamingConfig,
    #[serde(default)]
    pub entry: EntryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Field name validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Reject names that are not valid host identifiers
    #[serde(default = "default_true")]
    pub validate: bool,
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            validate: true,
            max_length: DEFAULT_MAX_NAME_LENGTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryConfig {
    /// Report a panic inside an entry point as an error instead of unwinding into the host
    #[serde(default = "default_true")]
    pub catch_panics: bool,
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self { catch_panics: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUNMAT_MX_LOG` and `RUST_LOG` are unset
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit span begin/end events to the trace hook
    #[serde(default)]
    pub traces: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            traces: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_length() -> usize {
    DEFAULT_MAX_NAME_LENGTH
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl MxConfig {
    /// Load from the configured file, then apply environment overrides.
    pub fn load() -> Result<MxConfig> {
        let mut config = match env::var(CONFIG_ENV) {
            Ok(path) if !path.is_empty() => {
                let path = PathBuf::from(path);
                info!("Loading mx configuration from: {}", path.display());
                Self::load_from_file(&path)?
            }
            _ => {
                debug!("No mx configuration file, using defaults");
                MxConfig::default()
            }
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<MxConfig> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?,
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?,
            Some("toml") => toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?,
            _ => {
                if let Ok(config) = toml::from_str(&content) {
                    config
                } else if let Ok(config) = serde_yaml::from_str(&content) {
                    config
                } else if let Ok(config) = serde_json::from_str(&content) {
                    config
                } else {
                    return Err(anyhow::anyhow!(
                        "Could not parse config file {} (tried TOML, YAML, JSON)",
                        path.display()
                    ));
                }
            }
        };

        Ok(config)
    }

    /// Apply overrides read through `lookup`, which maps a variable name to its value.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(flag) = lookup("RUNMAT_MX_VALIDATE_NAMES").and_then(|v| parse_bool(&v)) {
            self.naming.validate = flag;
        }

        if let Some(value) = lookup("RUNMAT_MX_MAX_NAME_LENGTH") {
            self.naming.max_length = value
                .trim()
                .parse()
                .with_context(|| format!("Invalid RUNMAT_MX_MAX_NAME_LENGTH: {value}"))?;
        }

        if let Some(flag) = lookup("RUNMAT_MX_CATCH_PANICS").and_then(|v| parse_bool(&v)) {
            self.entry.catch_panics = flag;
        }

        if let Some(level) = lookup("RUNMAT_MX_LOG_LEVEL").filter(|v| !v.trim().is_empty()) {
            self.logging.level = level.trim().to_string();
        }

        if let Some(flag) = lookup("RUNMAT_MX_TRACES").and_then(|v| parse_bool(&v)) {
            self.logging.traces = flag;
        }

        Ok(())
    }
}

static INSTALLED: OnceCell<MxConfig> = OnceCell::new();
static DEFAULT: Lazy<MxConfig> = Lazy::new(MxConfig::default);

/// Make `config` the process-wide configuration. Returns false if one was already installed.
pub fn install(config: MxConfig) -> bool {
    INSTALLED.set(config).is_ok()
}

/// The installed configuration, or the defaults when none was installed.
pub fn current() -> &'static MxConfig {
    INSTALLED.get().unwrap_or_else(|| Lazy::force(&DEFAULT))
}

/// Parse a boolean value from string with various formats
fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "enable" | "enabled" => Some(true),
        "0" | "false" | "no" | "off" | "disable" | "disabled" => Some(false),
        "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let config = MxConfig::default();
        assert!(config.naming.validate);
        assert_eq!(config.naming.max_length, 63);
        assert!(config.entry.catch_panics);
        assert_eq!(config.logging.level, "warn");
        assert!(!config.logging.traces);
    }

    #[test]
    fn test_partial_files_fill_defaults() {
        let dir = TempDir::new().unwrap();

        let yaml = dir.path().join("mx.yaml");
        fs::write(&yaml, "naming:\n  max_length: 31\n").unwrap();
        let config = MxConfig::load_from_file(&yaml).unwrap();
        assert_eq!(config.naming.max_length, 31);
        assert!(config.naming.validate);

        let json = dir.path().join("mx.json");
        fs::write(&json, r#"{"entry": {"catch_panics": false}}"#).unwrap();
        let config = MxConfig::load_from_file(&json).unwrap();
        assert!(!config.entry.catch_panics);
        assert_eq!(config.logging, LoggingConfig::default());

        let toml_path = dir.path().join("mx.toml");
        fs::write(&toml_path, "[logging]\nlevel = \"debug\"\ntraces = true\n").unwrap();
        let config = MxConfig::load_from_file(&toml_path).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.traces);
    }

    #[test]
    fn test_unknown_extension_is_auto_detected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mxrc");
        fs::write(&path, "[naming]\nvalidate = false\n").unwrap();
        assert!(!MxConfig::load_from_file(&path).unwrap().naming.validate);

        fs::write(&path, "{{{ not a config").unwrap();
        assert!(MxConfig::load_from_file(&path).is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("RUNMAT_MX_VALIDATE_NAMES", "off"),
            ("RUNMAT_MX_MAX_NAME_LENGTH", " 12 "),
            ("RUNMAT_MX_CATCH_PANICS", "no"),
            ("RUNMAT_MX_LOG_LEVEL", "trace"),
            ("RUNMAT_MX_TRACES", "garbage"),
        ]
        .into_iter()
        .collect();
        let mut config = MxConfig::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert!(!config.naming.validate);
        assert_eq!(config.naming.max_length, 12);
        assert!(!config.entry.catch_panics);
        assert_eq!(config.logging.level, "trace");
        assert!(!config.logging.traces);

        let mut config = MxConfig::default();
        let err = config.apply_overrides(|key| {
            (key == "RUNMAT_MX_MAX_NAME_LENGTH").then(|| "many".to_string())
        });
        assert!(err.is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("Enabled"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
