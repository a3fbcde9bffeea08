//! Navigation API.
//!
//! # Data Flow
//! ```text
//! UI navigation request
//!     → navigator.rs (assign ID + generation, publish Started)
//!     → routing::Resolver::navigate (deep resolution)
//!     → newer navigation started? publish Superseded : Completed | Failed
//!     → observers (broadcast) and current route (watch)
//! ```

pub mod navigator;

pub use navigator::{NavigationEvent, NavigationOutcome, Navigator};
