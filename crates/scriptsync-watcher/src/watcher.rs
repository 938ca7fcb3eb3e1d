//! Polling file watcher.
//!
//! Each cycle rescans the watch root, logs which scripts are new or changed,
//! and swaps the fresh snapshot into the store. Polling rather than OS
//! notifications keeps the behaviour identical across editors that save via
//! rename, network drives and git checkouts.

use crate::scanner::scan_directory;
use scriptsync_core::{changed_paths, ScriptStore, WatchConfig};
use tokio::sync::watch;
use tracing::{error, info};

/// Background task that keeps a [`ScriptStore`] in step with the watch root.
pub struct FileWatcher {
    config: WatchConfig,
    store: ScriptStore,
}

impl FileWatcher {
    /// Creates a watcher that writes into `store`.
    pub fn new(config: WatchConfig, store: ScriptStore) -> Self {
        Self { config, store }
    }

    /// Runs one scan cycle and returns the paths that are new or changed.
    ///
    /// The store is replaced even when nothing changed, so removals are
    /// picked up without being reported.
    pub async fn poll_once(&self) -> Vec<String> {
        let root = self.config.root.clone();
        let extensions = self.config.extensions.clone();

        let scan = tokio::task::spawn_blocking(move || scan_directory(&root, &extensions)).await;
        let result = match scan {
            Ok(result) => result,
            Err(e) => {
                error!("Scan task failed: {}", e);
                return Vec::new();
            }
        };

        let previous = self.store.get();
        let changed = changed_paths(&previous, &result.scripts);
        if !changed.is_empty() {
            info!("📝 File changes detected: {}", changed.join(", "));
        }

        self.store.replace(result.scripts);
        changed
    }

    /// Polls until `shutdown` turns `true` or its sender is dropped.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!("👁️  File watcher started for {}", self.config.root.display());

        loop {
            if *shutdown.borrow() {
                break;
            }

            self.poll_once().await;

            tokio::select! {
                _ = tokio::time::sleep(self.config.interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        info!("File watcher stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::tempdir;

    fn config(root: &std::path::Path, interval: Duration) -> WatchConfig {
        WatchConfig {
            root: root.to_path_buf(),
            interval,
            extensions: vec!["lua".to_string(), "luau".to_string()],
        }
    }

    #[tokio::test]
    async fn test_edit_is_reported_and_served() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.lua"), "print(1)").unwrap();
        fs::write(dir.path().join("b.luau"), "print(2)").unwrap();

        let store = ScriptStore::new();
        let watcher = FileWatcher::new(config(dir.path(), Duration::from_secs(2)), store.clone());

        let first = watcher.poll_once().await;
        assert_eq!(first, vec!["a.lua", "b.luau"]);
        assert_eq!(store.get()["a.lua"], "print(1)");

        fs::write(dir.path().join("a.lua"), "print(3)").unwrap();
        let second = watcher.poll_once().await;
        assert_eq!(second, vec!["a.lua"]);
        assert_eq!(store.get()["a.lua"], "print(3)");

        assert!(watcher.poll_once().await.is_empty());
    }

    #[tokio::test]
    async fn test_removal_shrinks_store_silently() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.lua"), "a").unwrap();
        fs::write(dir.path().join("b.lua"), "b").unwrap();

        let store = ScriptStore::new();
        let watcher = FileWatcher::new(config(dir.path(), Duration::from_secs(2)), store.clone());
        watcher.poll_once().await;

        fs::remove_file(dir.path().join("b.lua")).unwrap();
        let changed = watcher.poll_once().await;

        assert!(changed.is_empty());
        assert_eq!(store.len(), 1);
        assert!(!store.get().contains_key("b.lua"));
    }

    #[tokio::test]
    async fn test_missing_root_serves_empty_map() {
        let dir = tempdir().unwrap();
        let store = ScriptStore::new();
        let watcher = FileWatcher::new(
            config(&dir.path().join("absent"), Duration::from_secs(2)),
            store.clone(),
        );

        assert!(watcher.poll_once().await.is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_run_picks_up_changes_and_stops_on_shutdown() {
        let dir = tempdir().unwrap();
        let store = ScriptStore::new();
        let watcher = FileWatcher::new(
            config(dir.path(), Duration::from_millis(20)),
            store.clone(),
        );

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(watcher.run(shutdown_rx));

        fs::write(dir.path().join("late.lua"), "return 1").unwrap();

        let mut seen = false;
        for _ in 0..100 {
            if store.get().contains_key("late.lua") {
                seen = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(seen, "watcher never picked up late.lua");

        shutdown_tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("watcher did not stop")
            .unwrap();
    }
}
