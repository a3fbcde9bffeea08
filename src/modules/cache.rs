//! Single-flight module cache.
//!
//! # Responsibilities
//! - Keep loaded modules for the process lifetime
//! - Run at most one physical load per module at a time
//! - Enforce the load timeout
//!
//! # Design Decisions
//! - `DashMap` slot per key; entry guards are never held across an await
//! - In-flight loads publish through a `watch` channel that every waiter clones
//! - The load runs in a spawned task, so dropping a waiter never cancels it

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::watch;

use crate::modules::{LoadError, LoadedModule, LoaderRef, ModuleHandle, ModuleKey};
use crate::observability::metrics;

/// Result published by a load task to its waiters.
type LoadResult = Result<ModuleHandle, CacheError>;

/// Why the cache could not produce a module.
#[derive(Debug, Clone)]
pub enum CacheError {
    Failed(Arc<LoadError>),
    TimedOut(Duration),
}

enum Slot {
    Loading(watch::Receiver<Option<LoadResult>>),
    Ready(ModuleHandle),
}

/// Process-wide cache of loaded modules.
#[derive(Clone)]
pub struct ModuleCache {
    slots: Arc<DashMap<ModuleKey, Slot>>,
    load_timeout: Duration,
}

impl ModuleCache {
    pub fn new(load_timeout: Duration) -> Self {
        Self {
            slots: Arc::new(DashMap::new()),
            load_timeout,
        }
    }

    pub fn load_timeout(&self) -> Duration {
        self.load_timeout
    }

    /// Return the cached module, joining or starting its load if needed.
    pub async fn get_or_load(&self, loader: &LoaderRef) -> LoadResult {
        let mut rx = match self.slots.entry(loader.key().clone()) {
            Entry::Occupied(slot) => match slot.get() {
                Slot::Ready(handle) => {
                    metrics::record_cache_hit(loader.key());
                    return Ok(handle.clone());
                }
                Slot::Loading(rx) => {
                    tracing::debug!(module = %loader.key(), "Joining in-flight module load");
                    rx.clone()
                }
            },
            Entry::Vacant(slot) => {
                let (tx, rx) = watch::channel(None);
                slot.insert(Slot::Loading(rx.clone()));
                self.spawn_load(loader, tx);
                rx
            }
        };

        let aborted = || CacheError::Failed(Arc::new(LoadError::Aborted(loader.key().clone())));
        let published = match rx.wait_for(Option::is_some).await {
            Ok(result) => result.clone(),
            // Sender dropped without publishing: the load task panicked.
            Err(_) => None,
        };
        published.unwrap_or_else(|| {
            self.clear_loading(loader.key());
            Err(aborted())
        })
    }

    fn spawn_load(&self, loader: &LoaderRef, tx: watch::Sender<Option<LoadResult>>) {
        let key = loader.key().clone();
        let future = loader.loader().load();
        let slots = self.slots.clone();
        let timeout = self.load_timeout;

        tracing::info!(module = %key, "Loading module");

        tokio::spawn(async move {
            let started = Instant::now();
            let result = match tokio::time::timeout(timeout, future).await {
                Ok(Ok(routes)) => Ok(Arc::new(LoadedModule {
                    key: key.clone(),
                    routes,
                })),
                Ok(Err(e)) => Err(CacheError::Failed(Arc::new(e))),
                Err(_) => Err(CacheError::TimedOut(timeout)),
            };
            let elapsed = started.elapsed();

            match &result {
                Ok(handle) => {
                    slots.insert(key.clone(), Slot::Ready(handle.clone()));
                    metrics::record_module_load(&key, "ok", elapsed);
                    metrics::record_modules_loaded(count_ready(&slots));
                    tracing::info!(module = %key, elapsed_ms = elapsed.as_millis() as u64, "Module loaded");
                }
                Err(CacheError::Failed(e)) => {
                    slots.remove(&key);
                    metrics::record_module_load(&key, "failed", elapsed);
                    tracing::warn!(module = %key, error = %e, "Module load failed");
                }
                Err(CacheError::TimedOut(t)) => {
                    slots.remove(&key);
                    metrics::record_module_load(&key, "timeout", elapsed);
                    tracing::warn!(module = %key, timeout_secs = t.as_secs_f64(), "Module load timed out");
                }
            }

            // No receivers left is fine: the cache is already populated.
            let _ = tx.send(Some(result));
        });
    }

    fn clear_loading(&self, key: &ModuleKey) {
        self.slots
            .remove_if(key, |_, slot| matches!(slot, Slot::Loading(_)));
    }

    /// Whether `key` has finished loading successfully.
    pub fn is_loaded(&self, key: &ModuleKey) -> bool {
        self.slots
            .get(key)
            .map(|slot| matches!(slot.value(), Slot::Ready(_)))
            .unwrap_or(false)
    }

    /// Cached handle for `key`, if loaded.
    pub fn get(&self, key: &ModuleKey) -> Option<ModuleHandle> {
        self.slots.get(key).and_then(|slot| match slot.value() {
            Slot::Ready(handle) => Some(handle.clone()),
            Slot::Loading(_) => None,
        })
    }

    /// Keys of all loaded modules, sorted.
    pub fn loaded_modules(&self) -> Vec<ModuleKey> {
        let mut keys: Vec<ModuleKey> = self
            .slots
            .iter()
            .filter(|r| matches!(r.value(), Slot::Ready(_)))
            .map(|r| r.key().clone())
            .collect();
        keys.sort();
        keys
    }
}

fn count_ready(slots: &DashMap<ModuleKey, Slot>) -> usize {
    slots
        .iter()
        .filter(|r| matches!(r.value(), Slot::Ready(_)))
        .count()
}
