//! Configuration management for watchdog.
//!
//! Two layers:
//! - [`Requirements`]: the value a [`crate::WatchEngine`] is constructed from
//! - [`Settings`]: serializable settings for the binary, loaded from a JSON
//!   file and overridden by command-line arguments

mod requirements;
mod settings;

pub use requirements::{OperatingMode, Requirements, DEFAULT_SCAN_FREQUENCY};
pub use settings::Settings;
