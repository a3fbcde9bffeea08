//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Validate the route table before any request is served
//! - Wire resolver, module cache and navigator together
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - A table without a catch-all is rejected here, never at request time

use std::path::Path;
use std::sync::Arc;

use crate::config::{load_config, ConfigError, ResolverConfig};
use crate::modules::features::app_routes;
use crate::navigation::Navigator;
use crate::routing::{Resolver, RouteEntry, RouteTable, TableError};

/// Fatal configuration defect found during startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("route table error: {0}")]
    Table(#[from] TableError),
}

/// Load the configuration file if one is given, defaults otherwise.
pub fn load(path: Option<&Path>) -> Result<ResolverConfig, StartupError> {
    match path {
        Some(path) => {
            let config = load_config(path)?;
            tracing::info!(path = %path.display(), "Configuration loaded");
            Ok(config)
        }
        None => Ok(ResolverConfig::default()),
    }
}

/// Build a navigator over an arbitrary set of root entries.
pub fn build_navigator(
    config: &ResolverConfig,
    entries: Vec<RouteEntry>,
) -> Result<Navigator, StartupError> {
    let table = RouteTable::new(entries)?;
    Ok(navigator_for(config, table))
}

/// Build the navigator for the dashboard's compiled-in routes.
pub fn build_app_navigator(config: &ResolverConfig) -> Result<Navigator, StartupError> {
    let table = app_routes()?;
    Ok(navigator_for(config, table))
}

fn navigator_for(config: &ResolverConfig, table: RouteTable) -> Navigator {
    tracing::info!(
        routes = table.entries().len(),
        modules = table.module_keys().len(),
        load_timeout_secs = config.resolver.load_timeout_secs,
        max_redirect_hops = config.resolver.max_redirect_hops,
        "Route table validated"
    );
    let resolver = Resolver::new(table, &config.resolver);
    Navigator::new(Arc::new(resolver))
}
