//! Shared application state threaded through all handlers.

use std::sync::Arc;

use keystone_core::config::AppConfig;
use keystone_database::connection::DatabasePool;

use crate::problem::registry::ExceptionRegistry;

/// Application state available via Axum's `State` extractor.
///
/// The exception registry is populated during startup and treated as
/// immutable for the lifetime of the serving process.
#[derive(Clone)]
pub struct AppState {
    /// Merged application configuration.
    pub config: Arc<AppConfig>,
    /// Database connection pool.
    pub db: DatabasePool,
    /// Failure-category → handler registry.
    pub registry: Arc<ExceptionRegistry>,
}
