//! watchdog
//!
//! Polling filesystem watcher: periodically walks a set of root directories
//! and hands every newly appeared file to a user callback.
//!
//! ```no_run
//! use std::io::Read;
//! use watchdog::{Requirements, WatchEngine};
//!
//! let engine = WatchEngine::new(Some(
//!     Requirements {
//!         roots: vec!["/srv/inbox".into()],
//!         depth: 1,
//!         ..Requirements::default()
//!     }
//!     .with_handler(|mut file| {
//!         let mut contents = Vec::new();
//!         file.read_to_end(&mut contents)?;
//!         println!("{}: {} bytes", file.path().display(), contents.len());
//!         Ok(())
//!     }),
//! ));
//! engine.start()?;
//! // ...
//! engine.stop()?;
//! # Ok::<(), watchdog::Error>(())
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod observability;
pub mod watcher;

pub use config::{OperatingMode, Requirements, Settings};
pub use error::{Error, Result, WatcherError};
pub use watcher::{DetectedFile, EngineState, FileSystem, MemoryFileSystem, WatchEngine};
