//! Configuration settings and validation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::requirements::{OperatingMode, Requirements, DEFAULT_SCAN_FREQUENCY};
use crate::observability::TracingConfig;
use crate::{Error, Result};

/// Serializable watch settings for the `watchdog` binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root directories to scan.
    pub roots: Vec<PathBuf>,

    /// Levels below each root to descend into.
    pub depth: u32,

    /// Suppress reporting of files present at the first scan.
    pub ignore_startup_content: bool,

    /// Scan interval in milliseconds.
    pub scan_frequency_ms: u64,

    /// Delivery mode.
    pub operating_mode: OperatingMode,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON.
    pub log_json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            depth: 0,
            ignore_startup_content: false,
            scan_frequency_ms: u64::try_from(DEFAULT_SCAN_FREQUENCY.as_millis())
                .unwrap_or(3000),
            operating_mode: OperatingMode::default(),
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl Settings {
    /// Create settings with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a JSON file. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| {
            Error::config(format!("invalid config file '{}': {e}", path.display()))
        })
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.scan_frequency_ms == 0 {
            return Err(Error::config("scan_frequency_ms cannot be 0"));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(Error::config(format!(
                "invalid log level '{}', must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            )));
        }

        if self.roots.iter().any(|r| r.as_os_str().is_empty()) {
            return Err(Error::config("roots cannot contain an empty path"));
        }

        Ok(())
    }

    /// Scan interval as a `Duration`.
    #[must_use]
    pub const fn scan_frequency(&self) -> Duration {
        Duration::from_millis(self.scan_frequency_ms)
    }

    /// Build engine requirements from these settings. The handler is left unset.
    #[must_use]
    pub fn requirements(&self) -> Requirements {
        Requirements {
            roots: self.roots.clone(),
            depth: self.depth,
            ignore_startup_content: self.ignore_startup_content,
            scan_frequency: self.scan_frequency(),
            operating_mode: self.operating_mode,
            handler: None,
        }
    }

    /// Logging options for [`crate::observability::init_tracing`].
    #[must_use]
    pub fn tracing(&self) -> TracingConfig {
        TracingConfig {
            level: self.log_level.to_lowercase(),
            json: self.log_json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.scan_frequency_ms, 3000);
        assert_eq!(settings.operating_mode, OperatingMode::Burst);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_tracing_config_from_settings() {
        let settings = Settings {
            log_level: "DEBUG".to_string(),
            log_json: true,
            ..Default::default()
        };
        let tracing = settings.tracing();
        assert_eq!(tracing.level, "debug");
        assert!(tracing.json);
        assert_eq!(Settings::default().tracing(), TracingConfig::default());
    }

    #[test]
    fn test_validate_zero_frequency() {
        let settings = Settings {
            scan_frequency_ms: 0,
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("scan_frequency_ms"));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let settings = Settings {
            log_level: "verbose".to_string(),
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("log level"));
    }

    #[test]
    fn test_log_level_case_insensitive() {
        for level in ["TRACE", "Debug", "INFO", "Warn", "ERROR"] {
            let settings = Settings {
                log_level: level.to_string(),
                ..Default::default()
            };
            assert!(
                settings.validate().is_ok(),
                "Level '{level}' should be valid (case insensitive)"
            );
        }
    }

    #[test]
    fn test_validate_empty_root() {
        let settings = Settings {
            roots: vec![PathBuf::from("/srv/inbox"), PathBuf::new()],
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("empty path"));
    }

    #[test]
    fn test_from_json_file_partial() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("watchdog.json");
        fs::write(
            &path,
            r#"{ "roots": ["/srv/inbox"], "depth": 2, "operating_mode": "sequential" }"#,
        )
        .unwrap();

        let settings = Settings::from_json_file(&path).unwrap();
        assert_eq!(settings.roots, vec![PathBuf::from("/srv/inbox")]);
        assert_eq!(settings.depth, 2);
        assert_eq!(settings.operating_mode, OperatingMode::Sequential);
        assert_eq!(settings.scan_frequency_ms, 3000);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_from_json_file_invalid() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.json");
        fs::write(&path, "{ roots: ").unwrap();

        let err = Settings::from_json_file(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_from_json_file_missing() {
        let err = Settings::from_json_file("/nonexistent/watchdog.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_requirements_conversion() {
        let settings = Settings {
            roots: vec![PathBuf::from("/a"), PathBuf::from("/b")],
            depth: 3,
            ignore_startup_content: true,
            scan_frequency_ms: 250,
            operating_mode: OperatingMode::Sequential,
            ..Default::default()
        };

        let req = settings.requirements();
        assert_eq!(req.roots, settings.roots);
        assert_eq!(req.depth, 3);
        assert!(req.ignore_startup_content);
        assert_eq!(req.scan_frequency, Duration::from_millis(250));
        assert_eq!(req.operating_mode, OperatingMode::Sequential);
        assert!(req.handler.is_none());
    }
}
