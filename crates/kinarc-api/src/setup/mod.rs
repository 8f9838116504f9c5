//! Application setup and initialization
//!
//! Everything the binary needs to go from a `Config` to a serving router:
//! validation, database pool, object store gateway, state, and routes.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use kinarc_core::Config;
use std::sync::Arc;

/// Initialize the entire application.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    validation::validate_config(&config).context("Configuration validation failed")?;

    let pool = database::setup_database(&config).await?;

    let gateway = storage::setup_storage(&config)?;

    let state = Arc::new(AppState::new(config.clone(), pool, gateway));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
