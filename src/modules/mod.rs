//! Lazily loaded feature modules.
//!
//! # Data Flow
//! ```text
//! Resolver matches a LazyModule entry
//!     → cache.rs (ready? return handle : join or start the single load)
//!     → ModuleLoader::load (one call per module per process)
//!     → RouteTable of the module, wrapped in a ModuleHandle
//!
//! features.rs provides the built-in loaders for every feature area.
//! ```
//!
//! # Design Decisions
//! - Loaders are opaque: "given a loader reference, produce a RouteTable or fail"
//! - Loads run in their own task so abandoned callers don't cancel them
//! - Failures are not cached; the next request tries again

pub mod cache;
pub mod features;

use std::fmt;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde::Serialize;

use crate::routing::table::{RouteTable, TableError};

pub use cache::{CacheError, ModuleCache};
pub use features::FeatureArea;

/// Identity of a module. Cache key for single-flight loading.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ModuleKey(String);

impl ModuleKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error produced by a module loader.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("module '{0}' is unavailable")]
    Unavailable(ModuleKey),

    #[error("module '{module}' returned an invalid route table")]
    InvalidTable {
        module: ModuleKey,
        #[source]
        source: TableError,
    },

    #[error("load task for module '{0}' was aborted")]
    Aborted(ModuleKey),

    #[error("{0}")]
    Other(String),
}

/// Produces the route table of one feature module.
pub trait ModuleLoader: Send + Sync {
    fn load(&self) -> BoxFuture<'static, Result<RouteTable, LoadError>>;
}

/// Opaque handle stored in a `LazyModule` entry.
#[derive(Clone)]
pub struct LoaderRef {
    key: ModuleKey,
    loader: Arc<dyn ModuleLoader>,
}

impl LoaderRef {
    pub fn new(key: impl Into<String>, loader: Arc<dyn ModuleLoader>) -> Self {
        Self {
            key: ModuleKey::new(key),
            loader,
        }
    }

    pub fn key(&self) -> &ModuleKey {
        &self.key
    }

    pub(crate) fn loader(&self) -> Arc<dyn ModuleLoader> {
        self.loader.clone()
    }
}

impl fmt::Debug for LoaderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderRef").field("key", &self.key).finish()
    }
}

/// A loaded module: its identity and nested route table.
#[derive(Debug)]
pub struct LoadedModule {
    pub key: ModuleKey,
    pub routes: RouteTable,
}

/// Shared handle to a loaded module. Cloning is cheap; equal handles point
/// at the same cached load.
pub type ModuleHandle = Arc<LoadedModule>;
