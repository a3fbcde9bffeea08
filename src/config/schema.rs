//! Configuration schema definitions.
//!
//! The route table itself is compiled in; this file only tunes how it is
//! resolved and observed. All types derive Serde traits for deserialization
//! from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the route resolver.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ResolverConfig {
    /// Module loading and redirect limits.
    pub resolver: ResolverSettings,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// Module loading and redirect settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// Maximum time a module load may take, in seconds.
    pub load_timeout_secs: u64,

    /// Redirects followed per navigation before giving up.
    pub max_redirect_hops: usize,
}

impl ResolverSettings {
    pub fn load_timeout(&self) -> Duration {
        Duration::from_secs(self.load_timeout_secs)
    }
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            load_timeout_secs: 30,
            max_redirect_hops: 5,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
