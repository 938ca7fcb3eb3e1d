//! Scriptsync Watcher - directory scanning and change polling
//!
//! This crate keeps the [`ScriptStore`](scriptsync_core::ScriptStore) in step
//! with the filesystem. It is deliberately simple: every cycle rescans the
//! whole tree and swaps in a fresh snapshot.
//!
//! # Example
//!
//! ```no_run
//! use scriptsync_watcher::scan_directory;
//! use std::path::Path;
//!
//! let extensions = vec!["lua".to_string(), "luau".to_string()];
//! let result = scan_directory(Path::new("./src"), &extensions);
//! println!("Found {} scripts in {}ms", result.scripts.len(), result.duration_ms);
//! ```

mod scanner;
mod watcher;

pub use scanner::{scan_directory, ScanError, ScanResult};
pub use watcher::FileWatcher;
