//! Per-directory model handle cache.
//!
//! # Invariants
//! - At most one successful load per `(model kind, directory)` until `clear()`.
//! - Failed loads are not cached; the next request retries.
//! - Concurrent requests for the same directory block on one load.

use crate::inference::model::{IntentModel, ModelError, ModelLoader, SlotModel};
use log::{error, info};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Thread-safe cache of loaded model handles keyed by directory.
pub struct ModelCache<L: ModelLoader> {
    loader: L,
    intents: Mutex<BTreeMap<PathBuf, Arc<dyn IntentModel>>>,
    slots: Mutex<BTreeMap<PathBuf, Arc<dyn SlotModel>>>,
}

impl<L: ModelLoader> ModelCache<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            intents: Mutex::new(BTreeMap::new()),
            slots: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Returns the intent model for `dir`, loading it on first use.
    pub fn intent(&self, dir: &Path) -> Result<Arc<dyn IntentModel>, ModelError> {
        let mut cached = lock(&self.intents);
        if let Some(model) = cached.get(dir) {
            return Ok(Arc::clone(model));
        }
        let model = log_load("intent", dir, self.loader.load_intent(dir))?;
        cached.insert(dir.to_path_buf(), Arc::clone(&model));
        Ok(model)
    }

    /// Returns the slot model for `dir`, loading it on first use.
    pub fn slots(&self, dir: &Path) -> Result<Arc<dyn SlotModel>, ModelError> {
        let mut cached = lock(&self.slots);
        if let Some(model) = cached.get(dir) {
            return Ok(Arc::clone(model));
        }
        let model = log_load("slots", dir, self.loader.load_slots(dir))?;
        cached.insert(dir.to_path_buf(), Arc::clone(&model));
        Ok(model)
    }

    /// Number of cached handles across both model kinds.
    pub fn len(&self) -> usize {
        lock(&self.intents).len() + lock(&self.slots).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached handle.
    pub fn clear(&self) {
        lock(&self.intents).clear();
        lock(&self.slots).clear();
    }
}

// A poisoned map still holds fully inserted handles only.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn log_load<T>(kind: &str, dir: &Path, result: Result<T, ModelError>) -> Result<T, ModelError> {
    match &result {
        Ok(_) => info!(
            "event=model_load module=inference status=ok kind={} dir={}",
            kind,
            dir.display()
        ),
        Err(err) => error!(
            "event=model_load module=inference status=error kind={} dir={} error={}",
            kind,
            dir.display(),
            err
        ),
    }
    result
}
