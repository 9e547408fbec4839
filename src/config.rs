//! Configuration management for DailyFetch
//!
//! This module handles loading, parsing, and validating configuration
//! from YAML files with per-field defaults.

use crate::error::{DailyFetchError, Result};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Main configuration structure for DailyFetch
///
/// Holds everything the client core needs: the remote API endpoint,
/// schedule reconciliation behavior, assistant session behavior, and
/// the transcript storage location.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Remote API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Schedule reconciliation configuration
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Assistant session configuration
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Transcript storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Remote API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL for the news-digest backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "https://api.dailyfetch.app".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Schedule reconciliation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// IANA timezone name sent with schedule updates
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Debounce window for coalescing rapid edits, in milliseconds.
    /// Zero saves inline.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Default delivery time seeded when no schedule exists yet ("HH:MM")
    #[serde(default = "default_time")]
    pub default_time: String,

    /// Default topic seeded when no schedule exists and no topics are selected
    #[serde(default = "default_topic")]
    pub default_topic: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_time() -> String {
    "08:00".to_string()
}

fn default_topic() -> String {
    "general".to_string()
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            debounce_ms: default_debounce_ms(),
            default_time: default_time(),
            default_topic: default_topic(),
        }
    }
}

/// Assistant session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Maximum number of prior turns sent as conversation history
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

fn default_history_window() -> usize {
    12
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
        }
    }
}

/// Transcript storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Override path for the transcript database. When unset, the user
    /// data directory is used (or the DAILYFETCH_TRANSCRIPTS_DB env var).
    #[serde(default)]
    pub path: Option<String>,
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// A missing file is not an error: defaults are used so the CLI works
    /// out of the box.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| DailyFetchError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `DailyFetchError::Config` describing the first invalid field
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.api.base_url).map_err(|e| {
            DailyFetchError::Config(format!("Invalid api.base_url '{}': {}", self.api.base_url, e))
        })?;

        if self.api.timeout_seconds == 0 {
            return Err(DailyFetchError::Config(
                "api.timeout_seconds must be greater than zero".to_string(),
            )
            .into());
        }

        NaiveTime::parse_from_str(&self.schedule.default_time, "%H:%M").map_err(|e| {
            DailyFetchError::Config(format!(
                "Invalid schedule.default_time '{}': {}",
                self.schedule.default_time, e
            ))
        })?;

        if self.schedule.timezone.trim().is_empty() {
            return Err(
                DailyFetchError::Config("schedule.timezone must not be empty".to_string()).into(),
            );
        }

        if self.assistant.history_window == 0 {
            return Err(DailyFetchError::Config(
                "assistant.history_window must be greater than zero".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api.base_url, "https://api.dailyfetch.app");
        assert_eq!(config.schedule.debounce_ms, 500);
        assert_eq!(config.schedule.default_time, "08:00");
        assert_eq!(config.schedule.default_topic, "general");
        assert_eq!(config.assistant.history_window, 12);
        assert!(config.storage.path.is_none());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = Config::load("/nonexistent/dailyfetch.yaml").expect("load should not fail");
        assert_eq!(config.api.timeout_seconds, 30);
    }

    #[test]
    fn test_load_partial_yaml_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "api:\n  base_url: \"http://localhost:8080\"\nschedule:\n  debounce_ms: 0\n"
        )
        .expect("write");

        let config = Config::load(file.path()).expect("load");
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.schedule.debounce_ms, 0);
        assert_eq!(config.schedule.timezone, "UTC");
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let mut config = Config::default();
        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.api.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_default_time() {
        let mut config = Config::default();
        config.schedule.default_time = "25:99".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_timezone() {
        let mut config = Config::default();
        config.schedule.timezone = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_history_window() {
        let mut config = Config::default();
        config.assistant.history_window = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_yaml_roundtrip() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).expect("serialize");
        let parsed: Config = serde_yaml::from_str(&yaml).expect("deserialize");
        assert_eq!(parsed.api.base_url, config.api.base_url);
        assert_eq!(parsed.schedule.debounce_ms, config.schedule.debounce_ms);
    }
}
