//! Per-destination mutual exclusion.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;

/// Async locks keyed by output path.
///
/// Two workers never write the same output at once. Entries are dropped once
/// nobody holds or waits for them.
#[derive(Debug, Default, Clone)]
pub struct PathLocks {
    inner: Arc<Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>>,
}

/// Held lock on one output path.
pub struct PathGuard {
    guard: Option<OwnedMutexGuard<()>>,
    locks: PathLocks,
}

impl Drop for PathGuard {
    fn drop(&mut self) {
        // Release before cleanup so the entry's count drops back to one
        self.guard.take();
        self.locks.cleanup();
    }
}

impl PathLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `path`.
    pub async fn lock(&self, path: &Path) -> PathGuard {
        let mutex = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            map.entry(path.to_path_buf())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };

        PathGuard {
            guard: Some(mutex.lock_owned().await),
            locks: self.clone(),
        }
    }

    /// Number of paths currently tracked.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cleanup(&self) {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        // Only the map itself still references an idle entry
        map.retain(|_, mutex| Arc::strong_count(mutex) > 1);
    }
}
