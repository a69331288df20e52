//! A small CRUD service for email subscription records stored in PostgreSQL.
//!
//! Routes live in `web::routes`, the record store in `database`, and the CSV export in `export`.

pub mod app;
pub mod config;
pub mod database;
mod error;
pub mod export;
pub mod web;

// re-exports
pub use app::{serve, App, AppState};
pub use error::{Error, Result};

use tracing_subscriber::EnvFilter;

/// The filter used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "email_registry=info,tower_http=info";

/// Human readable tracing output, used in debug builds.
pub fn init_dbg_tracing() {
    tracing_subscriber::fmt()
        .without_time()
        .with_target(false)
        .with_env_filter(env_filter("email_registry=debug,tower_http=debug"))
        .compact()
        .init();
}

/// JSON tracing output, used in release builds.
pub fn init_production_tracing() {
    tracing_subscriber::fmt()
        .json()
        .with_current_span(true)
        .with_env_filter(env_filter(DEFAULT_LOG_FILTER))
        .init();
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}
