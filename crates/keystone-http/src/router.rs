//! Route definitions for the Keystone HTTP API.

use axum::http::StatusCode;
use axum::{Router, routing::get};

use crate::failure::Failure;
use crate::handlers;
use crate::state::AppState;

/// API routes, mounted under the configured API root by
/// [`build_app`](crate::app::build_app).
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(health_routes())
}

/// Health check endpoints (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}

/// Fallback for unmatched routes.
///
/// Returning a [`Failure`] routes the framework 404 through the error
/// boundary, so it gets the same problem+json body, trace id, and log
/// record as any other failure. The empty detail lets the payload builder
/// fill in the category default.
pub async fn not_found() -> Failure {
    Failure::http(StatusCode::NOT_FOUND, "")
}
