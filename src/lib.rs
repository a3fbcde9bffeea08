//! Route resolver for the institute administration dashboard.
//!
//! Maps navigation paths to lazily loaded feature modules (auth, dashboard,
//! leads, students, batches, employees, placements, reports), loading each
//! module once per process and falling back to the dashboard for anything
//! unmatched.

pub mod config;
pub mod lifecycle;
pub mod modules;
pub mod navigation;
pub mod observability;
pub mod routing;

pub use config::ResolverConfig;
pub use modules::features::{app_routes, FeatureArea};
pub use modules::{LoadError, LoaderRef, ModuleHandle, ModuleKey, ModuleLoader};
pub use navigation::{NavigationEvent, NavigationOutcome, Navigator};
pub use routing::{Resolution, ResolvedRoute, Resolver, RouteEntry, RouteTable, RoutingError};
