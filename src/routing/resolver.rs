//! Route resolution.
//!
//! # Responsibilities
//! - Match a path against the root table (`resolve`)
//! - Follow redirects with a bounded hop count (`resolve_following`)
//! - Walk nested module tables down to a page (`navigate`)
//! - Load modules on demand through the single-flight cache
//!
//! # Design Decisions
//! - Root table is passed in at construction and never mutated
//! - A failed load is an error, never a fall-through to the catch-all
//! - All redirects of one navigation share the same hop budget

use serde::Serialize;
use tracing::Instrument;

use crate::config::ResolverSettings;
use crate::modules::{CacheError, LoaderRef, ModuleCache, ModuleHandle, ModuleKey};
use crate::observability::metrics;
use crate::routing::error::RoutingError;
use crate::routing::matcher::{match_table, RequestPath};
use crate::routing::table::{RouteKind, RouteTable};

/// Outcome of a single resolution step against the root table.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// Caller must re-resolve against `target`.
    Redirected { target: String },
    /// A module was activated; `remaining` is left for its nested table.
    Activated {
        module: ModuleHandle,
        remaining: String,
    },
    /// A leaf page declared directly in the table.
    Page { component: String },
}

impl Resolution {
    pub fn summary(&self) -> ResolutionSummary {
        match self {
            Resolution::Redirected { target } => ResolutionSummary::Redirected {
                target: target.clone(),
            },
            Resolution::Activated { module, remaining } => ResolutionSummary::Activated {
                module: module.key.clone(),
                remaining: remaining.clone(),
            },
            Resolution::Page { component } => ResolutionSummary::Page {
                component: component.clone(),
            },
        }
    }
}

/// Serializable form of a `Resolution`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResolutionSummary {
    Redirected { target: String },
    Activated { module: ModuleKey, remaining: String },
    Page { component: String },
}

/// Fully resolved navigation: the page to render and how we got there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRoute {
    /// Final URL after all redirects.
    pub url: String,
    /// Modules activated from the root down.
    pub modules: Vec<ModuleKey>,
    pub component: String,
    /// Every redirect target taken, in order.
    pub redirects: Vec<String>,
}

/// Owned result of matching one table, free of borrows so loading can await.
enum Matched {
    Redirect(RequestPath),
    Module { loader: LoaderRef, consumed: usize },
    Page(String),
}

enum Walk {
    Redirect(RequestPath),
    Page {
        component: String,
        modules: Vec<ModuleKey>,
    },
}

/// Resolves paths against an immutable root table.
pub struct Resolver {
    table: RouteTable,
    cache: ModuleCache,
    max_redirect_hops: usize,
}

impl Resolver {
    pub fn new(table: RouteTable, settings: &ResolverSettings) -> Self {
        Self {
            table,
            cache: ModuleCache::new(settings.load_timeout()),
            max_redirect_hops: settings.max_redirect_hops,
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn cache(&self) -> &ModuleCache {
        &self.cache
    }

    pub fn max_redirect_hops(&self) -> usize {
        self.max_redirect_hops
    }

    /// Resolve `path` one step against the root table.
    pub async fn resolve(&self, path: &str) -> Result<Resolution, RoutingError> {
        let span = tracing::debug_span!("resolve", path = %path);
        async {
            let request = RequestPath::parse(path);
            tracing::trace!("Matching");
            let result: Result<Resolution, RoutingError> = match self.match_in(&self.table, &RequestPath::default(), &request, path)? {
                Matched::Redirect(target) => {
                    tracing::debug!(target = %target.to_url(), "Redirecting");
                    Ok(Resolution::Redirected {
                        target: target.to_url(),
                    })
                }
                Matched::Page(component) => Ok(Resolution::Page { component }),
                Matched::Module { loader, consumed } => {
                    let module = self.load(&loader, path).await?;
                    let remaining = request.skip(consumed).to_sub_path();
                    tracing::debug!(module = %module.key, remaining = %remaining, "Activated");
                    Ok(Resolution::Activated { module, remaining })
                }
            };
            if let Ok(resolution) = &result {
                metrics::record_resolution(resolution_label(resolution));
            }
            result
        }
        .instrument(span)
        .await
        .inspect_err(|e: &RoutingError| metrics::record_resolution(e.kind()))
    }

    /// Resolve `path`, following redirects until a module or page is reached.
    /// Never returns `Resolution::Redirected`.
    pub async fn resolve_following(&self, path: &str) -> Result<Resolution, RoutingError> {
        let mut current = path.to_string();
        let mut hops = 0;
        loop {
            match self.resolve(&current).await? {
                Resolution::Redirected { target } => {
                    hops += 1;
                    if hops > self.max_redirect_hops {
                        return Err(self.redirect_loop(path, hops));
                    }
                    current = target;
                }
                other => return Ok(other),
            }
        }
    }

    /// Resolve `path` through the root table and every nested module table
    /// until a page matches.
    pub async fn navigate(&self, path: &str) -> Result<ResolvedRoute, RoutingError> {
        let span = tracing::debug_span!("navigate", path = %path);
        async {
            let mut current = RequestPath::parse(path);
            let mut redirects = Vec::new();
            loop {
                match self.walk(&current, path).await? {
                    Walk::Redirect(target) => {
                        redirects.push(target.to_url());
                        if redirects.len() > self.max_redirect_hops {
                            return Err(self.redirect_loop(path, redirects.len()));
                        }
                        tracing::debug!(target = %target.to_url(), "Redirecting");
                        current = target;
                    }
                    Walk::Page { component, modules } => {
                        let route = ResolvedRoute {
                            url: current.to_url(),
                            modules,
                            component,
                            redirects,
                        };
                        tracing::debug!(url = %route.url, component = %route.component, "Navigation resolved");
                        return Ok(route);
                    }
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn walk(&self, url: &RequestPath, original: &str) -> Result<Walk, RoutingError> {
        let mut base = RequestPath::default();
        let mut remaining = url.clone();
        let mut modules = Vec::new();
        let mut current: Option<ModuleHandle> = None;

        loop {
            let matched = {
                let table = current.as_ref().map(|m| &m.routes).unwrap_or(&self.table);
                self.match_in(table, &base, &remaining, original)?
            };

            match matched {
                Matched::Redirect(target) => return Ok(Walk::Redirect(target)),
                Matched::Page(component) => return Ok(Walk::Page { component, modules }),
                Matched::Module { loader, consumed } => {
                    let module = self.load(&loader, original).await?;
                    base = base.join(&remaining.take(consumed));
                    remaining = remaining.skip(consumed);
                    modules.push(module.key.clone());
                    current = Some(module);
                }
            }
        }
    }

    /// Match `remaining` against `table`. Relative redirect targets are
    /// joined onto `base`, the path consumed by enclosing modules.
    fn match_in(
        &self,
        table: &RouteTable,
        base: &RequestPath,
        remaining: &RequestPath,
        original: &str,
    ) -> Result<Matched, RoutingError> {
        let found = match_table(table, remaining).ok_or_else(|| RoutingError::NoMatch {
            path: original.to_string(),
        })?;

        Ok(match &found.entry.kind {
            RouteKind::Redirect { target, .. } => {
                let target = if target.starts_with('/') {
                    RequestPath::parse(target)
                } else {
                    base.join(&RequestPath::parse(target))
                };
                Matched::Redirect(target)
            }
            RouteKind::LazyModule(loader) => Matched::Module {
                loader: loader.clone(),
                consumed: found.consumed,
            },
            RouteKind::Page { component } => Matched::Page(component.clone()),
        })
    }

    async fn load(&self, loader: &LoaderRef, path: &str) -> Result<ModuleHandle, RoutingError> {
        tracing::trace!(module = %loader.key(), "Loading");
        self.cache.get_or_load(loader).await.map_err(|e| {
            tracing::debug!(module = %loader.key(), "LoadFailed");
            match e {
                CacheError::Failed(cause) => RoutingError::ModuleLoadFailed {
                    path: path.to_string(),
                    cause,
                },
                CacheError::TimedOut(timeout) => RoutingError::ModuleLoadTimeout {
                    path: path.to_string(),
                    timeout,
                },
            }
        })
    }

    fn redirect_loop(&self, path: &str, hops: usize) -> RoutingError {
        tracing::warn!(path = %path, hops, max = self.max_redirect_hops, "Redirect loop detected");
        RoutingError::RedirectLoop {
            path: path.to_string(),
            hops,
        }
    }
}

fn resolution_label(resolution: &Resolution) -> &'static str {
    match resolution {
        Resolution::Redirected { .. } => "redirected",
        Resolution::Activated { .. } => "activated",
        Resolution::Page { .. } => "page",
    }
}
