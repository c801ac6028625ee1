//! Engine construction requirements and operating modes.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::watcher::{DetectedFile, Handler};
use crate::Error;

/// Scan interval used when none is given.
pub const DEFAULT_SCAN_FREQUENCY: Duration = Duration::from_millis(3000);

/// How newly detected files are delivered to the handler.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OperatingMode {
    /// Deliver each root's new files as soon as that root has been scanned.
    Sequential,
    /// Defer delivery until every root of the tick has been scanned.
    #[default]
    Burst,
}

impl OperatingMode {
    /// Lowercase name used in config files and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Burst => "burst",
        }
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperatingMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequential" => Ok(Self::Sequential),
            "burst" => Ok(Self::Burst),
            other => Err(Error::config(format!(
                "invalid operating mode '{other}', must be one of: sequential, burst"
            ))),
        }
    }
}

/// Everything a watch engine is built from.
///
/// `Requirements::default()` builds a fresh value on every call, so one
/// engine mutating its configuration never leaks into another's defaults.
#[derive(Clone)]
pub struct Requirements {
    /// Root directories to scan, in dispatch order.
    pub roots: Vec<PathBuf>,
    /// Levels below each root to descend into. 0 scans the root only.
    pub depth: u32,
    /// Seed the first scan of each root silently instead of reporting it.
    pub ignore_startup_content: bool,
    /// Time between the end of one tick and the start of the next.
    pub scan_frequency: Duration,
    /// Delivery mode.
    pub operating_mode: OperatingMode,
    /// Callback invoked for each newly detected file.
    pub handler: Option<Handler>,
}

impl Default for Requirements {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            depth: 0,
            ignore_startup_content: false,
            scan_frequency: DEFAULT_SCAN_FREQUENCY,
            operating_mode: OperatingMode::default(),
            handler: None,
        }
    }
}

impl fmt::Debug for Requirements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Requirements")
            .field("roots", &self.roots)
            .field("depth", &self.depth)
            .field("ignore_startup_content", &self.ignore_startup_content)
            .field("scan_frequency", &self.scan_frequency)
            .field("operating_mode", &self.operating_mode)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

impl Requirements {
    /// Create requirements with documented defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the handler from a closure.
    #[must_use]
    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(DetectedFile) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirements_defaults() {
        let req = Requirements::default();
        assert!(req.roots.is_empty());
        assert_eq!(req.depth, 0);
        assert!(!req.ignore_startup_content);
        assert_eq!(req.scan_frequency, Duration::from_millis(3000));
        assert_eq!(req.operating_mode, OperatingMode::Burst);
        assert!(req.handler.is_none());
    }

    #[test]
    fn test_defaults_are_independent() {
        let mut first = Requirements::default();
        first.roots.push(PathBuf::from("/srv/inbox"));
        first.depth = 4;

        let second = Requirements::default();
        assert!(second.roots.is_empty());
        assert_eq!(second.depth, 0);
    }

    #[test]
    fn test_with_handler() {
        let req = Requirements::new().with_handler(|_file| Ok(()));
        assert!(req.handler.is_some());
        assert!(format!("{req:?}").contains("handler: true"));
    }

    #[test]
    fn test_operating_mode_parse() {
        assert_eq!(
            "sequential".parse::<OperatingMode>().unwrap(),
            OperatingMode::Sequential
        );
        assert_eq!("BURST".parse::<OperatingMode>().unwrap(), OperatingMode::Burst);

        let err = "parallel".parse::<OperatingMode>().unwrap_err();
        assert!(err.to_string().contains("parallel"));
    }

    #[test]
    fn test_operating_mode_serde() {
        let json = serde_json::to_string(&OperatingMode::Sequential).unwrap();
        assert_eq!(json, "\"sequential\"");

        let mode: OperatingMode = serde_json::from_str("\"burst\"").unwrap();
        assert_eq!(mode, OperatingMode::Burst);
    }

    #[test]
    fn test_operating_mode_display() {
        assert_eq!(OperatingMode::Sequential.to_string(), "sequential");
        assert_eq!(OperatingMode::Burst.to_string(), "burst");
    }
}
