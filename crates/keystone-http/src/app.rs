//! Application builder — wires routes + middleware + state into an Axum app.

use std::sync::Arc;

use axum::{Router, middleware as axum_middleware};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use keystone_core::config::AppConfig;
use keystone_core::error::AppError;
use keystone_database::connection::DatabasePool;

use crate::middleware::cors::build_cors_layer;
use crate::middleware::error_boundary::error_boundary;
use crate::middleware::logging::request_logging;
use crate::middleware::request_id::propagate_request_id;
use crate::middleware::security_headers::security_headers;
use crate::problem::registry::ExceptionRegistry;
use crate::router::{api_routes, not_found};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let api_root = state.config.server.api_root();
    let routes = Router::new().nest(&api_root, api_routes());
    with_middleware(routes, state)
}

/// Apply the standard middleware stack to a set of routes.
///
/// Public so integration tests can mount their own routes behind the exact
/// production stack. Ordering matters: the trace-id middleware runs first so
/// every inner layer sees the id, and the error boundary sits above the
/// handlers so headers applied by the outer layers (security, CORS) also
/// reach rendered problem responses. Unmatched routes fall back to
/// [`not_found`] so framework 404s render as problem payloads too.
pub fn with_middleware(routes: Router<AppState>, state: AppState) -> Router {
    routes
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            error_boundary,
        ))
        .layer(build_cors_layer(&state.config.server.cors))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            security_headers,
        ))
        .layer(axum_middleware::from_fn(request_logging))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            propagate_request_id,
        ))
        .with_state(state)
}

/// Run the Keystone server with the given configuration and database pool.
pub async fn run_server(config: AppConfig, db: DatabasePool) -> Result<(), AppError> {
    let registry = Arc::new(ExceptionRegistry::with_defaults());
    let state = AppState {
        config: Arc::new(config.clone()),
        db,
        registry,
    };

    let app = build_app(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Keystone server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
}
