//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Navigation request (path)
//!     → matcher.rs (normalize, scan table in declared order)
//!     → resolver.rs (redirect | load module | page)
//!     → modules::cache (single-flight load of the matched module)
//!     → Return: Resolution, ResolvedRoute or RoutingError
//!
//! Route Compilation (at startup):
//!     RouteEntry[]
//!     → table.rs (validate invariants)
//!     → Freeze as immutable RouteTable owned by the Resolver
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (segment prefix matching only)
//! - Deterministic: same input always matches same route
//! - First match wins; catch-all only when nothing else matched

pub mod error;
pub mod matcher;
pub mod resolver;
pub mod table;

pub use error::RoutingError;
pub use matcher::RequestPath;
pub use resolver::{Resolution, ResolutionSummary, ResolvedRoute, Resolver};
pub use table::{RouteEntry, RouteKind, RouteTable, TableError, TableIssue, CATCH_ALL};
