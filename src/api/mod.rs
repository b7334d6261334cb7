//! Read-only REST API over a loaded model.
//!
//! Provides four GET endpoints:
//! - `/model`: model name, size and object counts
//! - `/idf`: the model translated to IDF text
//! - `/rooms`: one summary per room
//! - `/schedules/{name}`: hourly values with optional range filtering

mod handlers;
mod types;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::error::Result;
use crate::geometry::Model;
use crate::simulation::SolarDistribution;
use crate::translate::model_to_idf;

pub use types::{ErrorResponse, ModelSummary, RoomSummary, ScheduleQuery, ScheduleValues};

/// Immutable application state shared across all request handlers.
///
/// Constructed once when the model is loaded and wrapped in `Arc`; no locks
/// are needed since all data is read-only.
pub struct AppState {
    /// The loaded model.
    pub model: Model,
    /// IDF text of the model, translated at startup.
    pub idf: String,
}

impl AppState {
    /// Translates `model` once and keeps the IDF text alongside it.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be translated.
    pub fn new(model: Model, schedule_directory: &Path) -> Result<Self> {
        let idf = model_to_idf(&model, schedule_directory, SolarDistribution::default())?;
        Ok(Self { model, idf })
    }
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/model", get(handlers::get_model))
        .route("/idf", get(handlers::get_idf))
        .route("/rooms", get(handlers::get_rooms))
        .route("/schedules/{name}", get(handlers::get_schedule))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `addr` - Socket address to bind to
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to `addr` or the server
/// stops with an I/O error.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
