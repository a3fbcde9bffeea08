//! Resolution errors.

use std::sync::Arc;
use std::time::Duration;

use crate::modules::LoadError;

/// Outcome of a failed resolution. Returned to the caller, never raised as a panic.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RoutingError {
    #[error("failed to load module for '{path}': {cause}")]
    ModuleLoadFailed {
        path: String,
        #[source]
        cause: Arc<LoadError>,
    },

    #[error("loading module for '{path}' timed out after {}s", .timeout.as_secs_f64())]
    ModuleLoadTimeout { path: String, timeout: Duration },

    #[error("redirect loop while resolving '{path}' ({hops} hops)")]
    RedirectLoop { path: String, hops: usize },

    #[error("no route matches '{path}'")]
    NoMatch { path: String },
}

impl RoutingError {
    /// Short label used for metrics and events.
    pub fn kind(&self) -> &'static str {
        match self {
            RoutingError::ModuleLoadFailed { .. } => "load_failed",
            RoutingError::ModuleLoadTimeout { .. } => "load_timeout",
            RoutingError::RedirectLoop { .. } => "redirect_loop",
            RoutingError::NoMatch { .. } => "no_match",
        }
    }

    /// Whether the UI should offer a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RoutingError::ModuleLoadFailed { .. } | RoutingError::ModuleLoadTimeout { .. }
        )
    }
}
