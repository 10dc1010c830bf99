//! REST API over the loaded metadata and archetype profile.
//!
//! Provides four GET endpoints:
//! - `/counties`: counties present in the metadata
//! - `/feeder`: feeder study for a county and adoption rate
//! - `/targets`: intervention list for a county
//! - `/profile`: archetype profile points with optional range filtering

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::config::ScenarioConfig;
use crate::runner::StudyInputs;

pub use types::{ApiError, ErrorResponse};

/// Immutable application state shared across all request handlers.
///
/// Loaded once at startup and wrapped in `Arc`; no locks are needed
/// since every handler only reads it.
pub struct AppState {
    /// Scenario the inputs were loaded with.
    pub config: ScenarioConfig,
    /// Metadata table and windowed archetype profile.
    pub inputs: StudyInputs,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/counties", get(handlers::get_counties))
        .route("/feeder", get(handlers::get_feeder))
        .route("/targets", get(handlers::get_targets))
        .route("/profile", get(handlers::get_profile))
        .with_state(state)
}

/// Binds to `addr` and serves the API until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "API server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
