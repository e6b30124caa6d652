//! Configuration schema (resumeschema.toml)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use crate::diagnostic::{ViolationCode, Severity};

/// How an explicit `null` in a partial update is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullPolicy {
    /// `null` leaves the stored value unchanged, same as an absent field
    #[default]
    Keep,

    /// `null` is a constraint violation and the update is refused
    Reject,
}

impl std::fmt::Display for NullPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Keep => write!(f, "keep"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

impl std::str::FromStr for NullPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep" => Ok(Self::Keep),
            "reject" => Ok(Self::Reject),
            other => Err(ConfigError::ParseError(format!(
                "unknown null policy '{}', expected 'keep' or 'reject'",
                other
            ))),
        }
    }
}

/// Partial update settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateConfig {
    /// Treatment of explicit nulls
    #[serde(default)]
    pub null_policy: NullPolicy,
}

/// Severity threshold overrides for specific violation codes
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeverityThreshold {
    /// Map of violation code to severity override
    #[serde(default)]
    pub overrides: HashMap<String, Severity>,
}

impl SeverityThreshold {
    /// Get severity for a violation code, or default
    ///
    /// Structural codes always stay errors: a record that failed
    /// construction cannot be downgraded into an accepted one.
    pub fn get_severity(&self, code: ViolationCode, default: Severity) -> Severity {
        if code.is_structural() {
            return Severity::Error;
        }
        self.overrides
            .get(code.as_str())
            .copied()
            .unwrap_or(default)
    }

    /// Set severity override for a code
    pub fn set_override(&mut self, code: ViolationCode, severity: Severity) {
        self.overrides.insert(code.as_str().to_string(), severity);
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Replace offending values (ID numbers, phones, emails) with a
    /// placeholder in reports and console output
    #[serde(default)]
    pub redact_sensitive_data: bool,

    /// Partial update behaviour
    #[serde(default)]
    pub update: UpdateConfig,

    /// Severity thresholds
    #[serde(default)]
    pub severity: SeverityThreshold,
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.update.null_policy, NullPolicy::Keep);
        assert!(!config.redact_sensitive_data);
    }

    #[test]
    fn severity_override() {
        let mut threshold = SeverityThreshold::default();
        threshold.set_override(ViolationCode::SalaryRangeInverted, Severity::Error);

        assert_eq!(
            threshold.get_severity(ViolationCode::SalaryRangeInverted, Severity::Warn),
            Severity::Error
        );
        assert_eq!(
            threshold.get_severity(ViolationCode::DateRangeInverted, Severity::Warn),
            Severity::Warn
        );
    }

    #[test]
    fn structural_codes_cannot_be_downgraded() {
        let mut threshold = SeverityThreshold::default();
        threshold.set_override(ViolationCode::FieldUnknown, Severity::Info);

        assert_eq!(
            threshold.get_severity(ViolationCode::FieldUnknown, Severity::Error),
            Severity::Error
        );
    }

    #[test]
    fn parse_toml_sections() {
        let config = Config::from_toml(
            r#"
redact_sensitive_data = true

[update]
null_policy = "reject"

[severity.overrides]
DATE_RANGE_INVERTED = "error"
"#,
        )
        .unwrap();

        assert_eq!(config.update.null_policy, NullPolicy::Reject);
        assert!(config.redact_sensitive_data);
        assert_eq!(
            config.severity.get_severity(ViolationCode::DateRangeInverted, Severity::Warn),
            Severity::Error
        );
    }

    #[test]
    fn unknown_null_policy_is_rejected() {
        assert!(Config::from_toml("[update]\nnull_policy = \"erase\"").is_err());
        assert!("erase".parse::<NullPolicy>().is_err());
        assert_eq!("reject".parse::<NullPolicy>().unwrap(), NullPolicy::Reject);
    }

    #[test]
    fn config_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resumeschema.toml");

        let mut config = Config::default();
        config.update.null_policy = NullPolicy::Reject;
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
