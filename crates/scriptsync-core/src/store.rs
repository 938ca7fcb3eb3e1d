//! The shared script cache.
//!
//! One writer (the file watcher) swaps in whole snapshots; any number of
//! readers (HTTP requests) load the current one without locking. A reader
//! always sees a map from a single completed scan.

use crate::script::ScriptMap;
use arc_swap::ArcSwap;
use std::sync::Arc;

/// Cloneable handle to the current [`ScriptMap`] snapshot.
#[derive(Clone, Default)]
pub struct ScriptStore {
    current: Arc<ArcSwap<ScriptMap>>,
}

impl ScriptStore {
    /// Creates a store holding an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `scripts`.
    pub fn with_scripts(scripts: ScriptMap) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(scripts)),
        }
    }

    /// Returns the current snapshot.
    pub fn get(&self) -> Arc<ScriptMap> {
        self.current.load_full()
    }

    /// Replaces the snapshot wholesale.
    pub fn replace(&self, scripts: ScriptMap) {
        self.current.store(Arc::new(scripts));
    }

    /// Number of scripts in the current snapshot.
    pub fn len(&self) -> usize {
        self.current.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.load().is_empty()
    }
}

impl std::fmt::Debug for ScriptStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptStore")
            .field("scripts", &self.len())
            .finish()
    }
}
