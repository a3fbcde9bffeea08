//! Shared loaders for integration tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use route_resolver::config::ResolverSettings;
use route_resolver::{
    app_routes, FeatureArea, LoadError, LoaderRef, ModuleKey, ModuleLoader, Resolver, RouteTable,
};

/// Behavior of an instrumented feature loader.
#[derive(Clone, Copy)]
pub enum Mode {
    Ok,
    Fail,
}

/// Wraps a built-in feature loader, counting calls and adding latency.
pub struct CountingLoader {
    area: FeatureArea,
    calls: Arc<AtomicU32>,
    delay: Duration,
    mode: Mode,
}

impl ModuleLoader for CountingLoader {
    fn load(&self) -> BoxFuture<'static, Result<RouteTable, LoadError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let area = self.area;
        let delay = self.delay;
        let mode = self.mode;
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            match mode {
                Mode::Ok => area.routes().map_err(|source| LoadError::InvalidTable {
                    module: area.key(),
                    source,
                }),
                Mode::Fail => Err(LoadError::Unavailable(area.key())),
            }
        })
    }
}

/// Per-module call counters of an instrumented app.
#[derive(Clone, Default)]
pub struct LoadCounts {
    counters: Arc<std::sync::Mutex<Vec<(ModuleKey, Arc<AtomicU32>)>>>,
}

impl LoadCounts {
    pub fn get(&self, area: FeatureArea) -> u32 {
        let key = area.key();
        self.counters
            .lock()
            .unwrap()
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, c)| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counters
            .lock()
            .unwrap()
            .iter()
            .map(|(_, c)| c.load(Ordering::SeqCst))
            .sum()
    }
}

/// The dashboard's route table with instrumented loaders.
/// `configure` picks delay and mode per feature area.
pub fn instrumented_app<F>(settings: ResolverSettings, configure: F) -> (Resolver, LoadCounts)
where
    F: Fn(FeatureArea) -> (Duration, Mode),
{
    let counts = LoadCounts::default();
    let table = app_routes_with_counts(&counts, configure);
    (Resolver::new(table, &settings), counts)
}

fn app_routes_with_counts<F>(counts: &LoadCounts, configure: F) -> RouteTable
where
    F: Fn(FeatureArea) -> (Duration, Mode),
{
    route_resolver::modules::features::app_routes_with(|area| {
        let calls = Arc::new(AtomicU32::new(0));
        counts
            .counters
            .lock()
            .unwrap()
            .push((area.key(), calls.clone()));
        let (delay, mode) = configure(area);
        LoaderRef::new(
            area.path(),
            Arc::new(CountingLoader {
                area,
                calls,
                delay,
                mode,
            }),
        )
    })
    .unwrap()
}

/// Uninstrumented resolver over the real app routes.
#[allow(dead_code)]
pub fn app_resolver() -> Resolver {
    Resolver::new(app_routes().unwrap(), &ResolverSettings::default())
}
