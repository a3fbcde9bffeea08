//! Navigation front end used by the UI layer.
//!
//! # Responsibilities
//! - Tag each navigation with an ID and a generation
//! - Discard results of navigations superseded by a newer one
//! - Notify observers of every navigation event
//! - Remember the last completed route
//!
//! # Design Decisions
//! - Superseded navigations are not cancelled; their module loads still
//!   finish and populate the cache
//! - Events use a broadcast channel; slow observers lag rather than block

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{broadcast, watch};
use uuid::Uuid;

use crate::observability::metrics;
use crate::routing::{ResolvedRoute, Resolver, RoutingError};

const EVENT_CAPACITY: usize = 64;

/// Event published for every navigation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NavigationEvent {
    Started { id: Uuid, path: String },
    Completed { id: Uuid, route: ResolvedRoute },
    Failed {
        id: Uuid,
        path: String,
        error: String,
        retryable: bool,
    },
    Superseded { id: Uuid, path: String },
}

impl NavigationEvent {
    pub fn id(&self) -> Uuid {
        match self {
            NavigationEvent::Started { id, .. }
            | NavigationEvent::Completed { id, .. }
            | NavigationEvent::Failed { id, .. }
            | NavigationEvent::Superseded { id, .. } => *id,
        }
    }
}

/// Result of a navigation that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Completed(ResolvedRoute),
    /// A newer navigation started before this one finished.
    Superseded,
}

pub struct Navigator {
    resolver: Arc<Resolver>,
    generation: AtomicU64,
    events: broadcast::Sender<NavigationEvent>,
    current: watch::Sender<Option<ResolvedRoute>>,
}

impl Navigator {
    pub fn new(resolver: Arc<Resolver>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (current, _) = watch::channel(None);
        Self {
            resolver,
            generation: AtomicU64::new(0),
            events,
            current,
        }
    }

    pub fn resolver(&self) -> &Arc<Resolver> {
        &self.resolver
    }

    /// Subscribe to navigation events.
    pub fn subscribe(&self) -> broadcast::Receiver<NavigationEvent> {
        self.events.subscribe()
    }

    /// Watch the last completed route.
    pub fn watch_current(&self) -> watch::Receiver<Option<ResolvedRoute>> {
        self.current.subscribe()
    }

    pub fn current(&self) -> Option<ResolvedRoute> {
        self.current.borrow().clone()
    }

    /// Navigate to `path`. The newest navigation wins: if another one starts
    /// before this finishes, the result is discarded.
    pub async fn navigate(&self, path: &str) -> Result<NavigationOutcome, RoutingError> {
        let id = Uuid::new_v4();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        tracing::info!(navigation_id = %id, path = %path, "Navigation started");
        self.publish(NavigationEvent::Started {
            id,
            path: path.to_string(),
        });

        let result = self.resolver.navigate(path).await;

        match result {
            Ok(route) => {
                if !self.commit(generation, &route) {
                    return Ok(self.superseded(id, path));
                }
                tracing::info!(
                    navigation_id = %id,
                    url = %route.url,
                    component = %route.component,
                    "Navigation completed"
                );
                metrics::record_navigation("completed");
                self.publish(NavigationEvent::Completed {
                    id,
                    route: route.clone(),
                });
                Ok(NavigationOutcome::Completed(route))
            }
            Err(_) if !self.is_latest(generation) => Ok(self.superseded(id, path)),
            Err(e) => {
                tracing::warn!(navigation_id = %id, path = %path, error = %e, "Navigation failed");
                metrics::record_navigation("failed");
                self.publish(NavigationEvent::Failed {
                    id,
                    path: path.to_string(),
                    error: e.to_string(),
                    retryable: e.is_retryable(),
                });
                Err(e)
            }
        }
    }

    fn is_latest(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Store `route` as current if `generation` is still the newest. The check
    /// runs under the watch lock, so an older navigation can never overwrite
    /// a newer one.
    fn commit(&self, generation: u64, route: &ResolvedRoute) -> bool {
        self.current.send_if_modified(|current| {
            if self.is_latest(generation) {
                *current = Some(route.clone());
                true
            } else {
                false
            }
        })
    }

    fn superseded(&self, id: Uuid, path: &str) -> NavigationOutcome {
        tracing::debug!(navigation_id = %id, path = %path, "Navigation superseded");
        metrics::record_navigation("superseded");
        self.publish(NavigationEvent::Superseded {
            id,
            path: path.to_string(),
        });
        NavigationOutcome::Superseded
    }

    fn publish(&self, event: NavigationEvent) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }
}
