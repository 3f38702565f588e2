//! Guard configuration parsing and validation.
//!
//! This module handles the deployment-facing configuration of the
//! admission pipeline: the scalar flags (name length limit, reserved
//! control-token guard, ordering, developer mode) and the four optional
//! comma-delimited pattern strings. Configuration is loaded once at
//! initialization (TOML file or string) and is read-only for the
//! lifetime of a guard; runtime pattern replacement goes through the
//! guard's atomic slot swap instead of mutating a config value.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::pattern::PatternError;

/// Default maximum accepted parameter-name length.
///
/// Bounds the worst-case expression-path depth handed to the binding
/// target, which makes this a denial-of-service control rather than a
/// style preference.
pub const DEFAULT_MAX_NAME_LENGTH: usize = 100;

/// Deployment configuration for a [`ParameterGuard`].
///
/// All fields have permissive-but-safe defaults: no pattern sets, name
/// length capped at [`DEFAULT_MAX_NAME_LENGTH`], every feature flag off.
///
/// [`ParameterGuard`]: crate::guard::ParameterGuard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GuardConfig {
    /// Maximum accepted parameter-name length.
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,

    /// Whether the reserved control-token guard is active.
    ///
    /// When set, names matching `action:`/`method:` prefixes are
    /// rejected outright; they address dispatch machinery, not data
    /// fields.
    #[serde(default)]
    pub dmi_enabled: bool,

    /// Whether admitted names must additionally appear in the target's
    /// declared bindable-field metadata.
    ///
    /// The metadata check itself is an extension point that currently
    /// passes every name; the flag is carried so deployments setting it
    /// keep working when the check lands.
    #[serde(default)]
    pub require_annotations: bool,

    /// Whether admitted parameters are reordered shallow-before-deep.
    ///
    /// Off by default: output preserves insertion order as received.
    #[serde(default)]
    pub ordered: bool,

    /// Developer mode: rejections and binding failures log at warn/error
    /// with pattern detail and are surfaced back to the target. Never
    /// changes which entries are rejected.
    #[serde(default)]
    pub dev_mode: bool,

    /// Comma-delimited deny-list for parameter names.
    #[serde(default)]
    pub denied_name_patterns: Option<String>,

    /// Comma-delimited allow-list for parameter names. When present,
    /// a name must match to be admitted.
    #[serde(default)]
    pub accepted_name_patterns: Option<String>,

    /// Comma-delimited deny-list for parameter values.
    #[serde(default)]
    pub denied_value_patterns: Option<String>,

    /// Comma-delimited allow-list for parameter values. When present,
    /// a non-empty value must match to be admitted.
    #[serde(default)]
    pub accepted_value_patterns: Option<String>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            max_name_length: default_max_name_length(),
            dmi_enabled: false,
            require_annotations: false,
            ordered: false,
            dev_mode: false,
            denied_name_patterns: None,
            accepted_name_patterns: None,
            denied_value_patterns: None,
            accepted_value_patterns: None,
        }
    }
}

const fn default_max_name_length() -> usize {
    DEFAULT_MAX_NAME_LENGTH
}

impl GuardConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails
    /// validation.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid, contains unknown keys,
    /// or fails validation.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate scalar fields.
    ///
    /// Pattern strings are validated separately when the guard compiles
    /// them, so a bad pattern is reported with its offending text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if `max_name_length` is zero:
    /// a zero limit would reject every parameter, which is never an
    /// intended deployment.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_name_length == 0 {
            return Err(ConfigError::Validation(
                "max_name_length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// I/O error reading a configuration file.
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Validation error.
    #[error("configuration validation failed: {0}")]
    Validation(String),

    /// A configured pattern string failed to compile.
    ///
    /// Fatal to the configuration unit: the guard refuses to start
    /// rather than fall back to accepting everything.
    #[error("invalid configured pattern: {0}")]
    Pattern(#[from] PatternError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_permissive_but_bounded() {
        let config = GuardConfig::default();
        assert_eq!(config.max_name_length, 100);
        assert!(!config.dmi_enabled);
        assert!(!config.ordered);
        assert!(!config.dev_mode);
        assert!(config.denied_name_patterns.is_none());
        assert!(config.accepted_name_patterns.is_none());
    }

    #[test]
    fn parse_empty_toml_yields_defaults() {
        let config = GuardConfig::from_toml("").unwrap();
        assert_eq!(config, GuardConfig::default());
    }

    #[test]
    fn parse_full_toml() {
        let toml = r#"
            max_name_length = 64
            dmi_enabled = true
            ordered = true
            dev_mode = true
            denied_name_patterns = "^internal\\..*,^class\\..*"
            accepted_value_patterns = "[\\w\\s-]*"
        "#;

        let config = GuardConfig::from_toml(toml).unwrap();
        assert_eq!(config.max_name_length, 64);
        assert!(config.dmi_enabled);
        assert!(config.ordered);
        assert!(config.dev_mode);
        assert_eq!(
            config.denied_name_patterns.as_deref(),
            Some("^internal\\..*,^class\\..*")
        );
        assert_eq!(config.accepted_value_patterns.as_deref(), Some("[\\w\\s-]*"));
        assert!(config.denied_value_patterns.is_none());
    }

    #[test]
    fn rejects_zero_name_length() {
        let result = GuardConfig::from_toml("max_name_length = 0");
        match result.unwrap_err() {
            ConfigError::Validation(msg) => {
                assert!(msg.contains("max_name_length"), "unexpected message: {msg}");
            },
            other => panic!("expected ConfigError::Validation, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_keys() {
        let result = GuardConfig::from_toml("max_param_length = 10");
        assert!(result.is_err(), "unknown keys must be rejected");
    }

    #[test]
    fn toml_round_trip() {
        let config = GuardConfig {
            max_name_length: 42,
            dmi_enabled: true,
            denied_name_patterns: Some("^debug\\..*".to_string()),
            ..GuardConfig::default()
        };
        let rendered = config.to_toml().unwrap();
        let parsed = GuardConfig::from_toml(&rendered).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guard.toml");
        let config = GuardConfig {
            ordered: true,
            ..GuardConfig::default()
        };
        std::fs::write(&path, config.to_toml().unwrap()).unwrap();

        let loaded = GuardConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
