//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Validate route table → Build resolver → Navigator
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then routes, then the navigator
//! - Nothing is resolved until every check has passed

pub mod startup;

pub use startup::{build_app_navigator, build_navigator, StartupError};
