//! watchdog - polling file watcher
//!
//! Entry point for the `watchdog` binary: logs every newly appearing file
//! until interrupted.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use watchdog::observability::init_tracing;
use watchdog::{Error, OperatingMode, Result, Settings, WatchEngine};

/// watchdog - report files as they appear under watched directories
#[derive(Parser, Debug)]
#[command(name = "watchdog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON settings file; command-line values override it
    #[arg(short, long, env = "WATCHDOG_CONFIG")]
    config: Option<PathBuf>,

    /// Root directories to watch
    #[arg(short, long, env = "WATCHDOG_ROOTS", value_delimiter = ',')]
    root: Vec<PathBuf>,

    /// Levels below each root to scan (0 = root only)
    #[arg(short, long, env = "WATCHDOG_DEPTH")]
    depth: Option<u32>,

    /// Scan interval in milliseconds
    #[arg(short, long, env = "WATCHDOG_INTERVAL_MS")]
    interval_ms: Option<u64>,

    /// Delivery mode
    #[arg(short, long, env = "WATCHDOG_MODE", value_enum)]
    mode: Option<OperatingMode>,

    /// Do not report files that exist when watching starts
    #[arg(long, env = "WATCHDOG_IGNORE_STARTUP")]
    ignore_startup: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "WATCHDOG_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging output
    #[arg(long, env = "WATCHDOG_LOG_JSON")]
    log_json: bool,
}

impl Cli {
    /// Merge file settings (if any) with command-line overrides.
    fn settings(self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::from_json_file(path)?,
            None => Settings::default(),
        };

        if !self.root.is_empty() {
            settings.roots = self.root;
        }
        if let Some(depth) = self.depth {
            settings.depth = depth;
        }
        if let Some(interval) = self.interval_ms {
            settings.scan_frequency_ms = interval;
        }
        if let Some(mode) = self.mode {
            settings.operating_mode = mode;
        }
        if let Some(level) = self.log_level {
            settings.log_level = level;
        }
        settings.ignore_startup_content |= self.ignore_startup;
        settings.log_json |= self.log_json;

        Ok(settings)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Cli::parse().settings()?;

    init_tracing(&settings.tracing());

    tracing::info!("watchdog v{} starting...", env!("CARGO_PKG_VERSION"));
    tracing::debug!(?settings, "Configuration loaded");

    settings.validate()?;

    let requirements = settings.requirements().with_handler(|mut file| {
        let mut size = 0u64;
        let mut buf = [0u8; 8192];
        loop {
            let n = file.read(&mut buf)?;
            if n == 0 {
                break;
            }
            size += n as u64;
        }
        tracing::info!(path = %file.path().display(), bytes = size, "New file");
        Ok(())
    });

    let engine = Arc::new(WatchEngine::new(Some(requirements)));
    engine.start()?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Interrupted, stopping");

    let stopper = Arc::clone(&engine);
    tokio::task::spawn_blocking(move || stopper.stop())
        .await
        .map_err(|e| Error::internal(format!("stop task failed: {e}")))??;

    let stats = engine.stats();
    tracing::info!(
        ticks = stats.ticks,
        detected = stats.files_detected,
        delivered = stats.files_dispatched,
        "watchdog stopped"
    );

    Ok(())
}
