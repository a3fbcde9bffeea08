//! Route resolver CLI.
//!
//! # Architecture Overview
//!
//! ```text
//!     path ──▶ routing::matcher ──▶ routing::resolver ──┬──▶ Redirected(target) ──┐
//!                    ▲                                  │                         │
//!                    └──────────── re-resolve ◀─────────┼─────────────────────────┘
//!                                                       │
//!                                                       ▼
//!                                          modules::cache (single-flight)
//!                                                       │
//!                                                       ▼
//!                                          feature module route table
//!                                                       │
//!                                                       ▼
//!                                   navigation::Navigator ──▶ observers
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use route_resolver::lifecycle::startup;
use route_resolver::navigation::NavigationOutcome;
use route_resolver::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "route-resolver")]
#[command(about = "Resolve dashboard navigation paths to feature modules", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long, env = "ROUTE_RESOLVER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one step against the root table
    Resolve {
        path: String,
        /// Follow redirects until a module is activated
        #[arg(short, long)]
        follow: bool,
    },
    /// Resolve through nested module tables down to a page
    Navigate { path: String },
    /// Print the root route table
    Routes,
    /// Validate configuration and route tables
    Check,
}

#[derive(Serialize)]
struct CheckReport {
    config: String,
    routes: usize,
    modules: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = startup::load(cli.config.as_deref())?;
    logging::init_logging(&config.observability);

    tracing::info!("route-resolver v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            if let Err(e) = metrics::init_metrics(addr) {
                tracing::error!(error = %e, "Failed to start metrics endpoint");
            }
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let navigator = startup::build_app_navigator(&config)?;
    let resolver = navigator.resolver().clone();

    match cli.command {
        Commands::Resolve { path, follow } => {
            let resolution = if follow {
                resolver.resolve_following(&path).await?
            } else {
                resolver.resolve(&path).await?
            };
            print_json(&resolution.summary())?;
        }
        Commands::Navigate { path } => match navigator.navigate(&path).await? {
            NavigationOutcome::Completed(route) => print_json(&route)?,
            NavigationOutcome::Superseded => tracing::warn!("Navigation superseded"),
        },
        Commands::Routes => {
            print_json(&resolver.table().describe())?;
        }
        Commands::Check => {
            // Loading every feature table validates them too.
            let mut modules = Vec::new();
            for key in resolver.table().module_keys() {
                let route = resolver.navigate(&format!("/{}", key)).await?;
                modules.push(format!("{} -> {}", key, route.component));
            }
            let report = CheckReport {
                config: cli
                    .config
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "defaults".to_string()),
                routes: resolver.table().entries().len(),
                modules,
            };
            print_json(&report)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
