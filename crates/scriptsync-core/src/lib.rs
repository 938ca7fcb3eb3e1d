//! Scriptsync Core - shared types for the script sync service
//!
//! This crate holds the pieces every other scriptsync crate agrees on:
//!
//! - [`ScriptMap`]: the path-to-content snapshot served to consumers
//! - [`changed_paths`]: the diff the watcher logs after every scan
//! - [`ScriptStore`]: the atomically swappable cache the server reads from
//! - [`Config`]: startup configuration, loadable from a JSON file
//!
//! # Example
//!
//! ```
//! use scriptsync_core::{changed_paths, ScriptMap, ScriptStore};
//!
//! let store = ScriptStore::new();
//!
//! let mut next = ScriptMap::new();
//! next.insert("a.lua".to_string(), "print(1)".to_string());
//!
//! let changed = changed_paths(&store.get(), &next);
//! store.replace(next);
//!
//! assert_eq!(changed, vec!["a.lua".to_string()]);
//! assert_eq!(store.get().len(), 1);
//! ```

mod config;
mod error;
mod script;
mod store;

pub use config::{Config, SyncConfig, WatchConfig, DEFAULT_CONFIG_PATH};
pub use error::{ConfigError, Result};
pub use script::{changed_paths, ScriptMap};
pub use store::ScriptStore;
