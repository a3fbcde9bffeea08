//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Resolver, module cache and navigator produce:
//!     → logging.rs (structured log events, one per state transition)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stderr, plain or JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Logs go to stderr so CLI output on stdout stays machine readable
//! - Navigation ID flows through navigator events and log fields
//! - Metrics are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
