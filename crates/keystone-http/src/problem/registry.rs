//! Category → handler dispatch for classified failures.
//!
//! The registry is built once during startup, wrapped in an `Arc`, and is
//! read-only for the lifetime of the serving process; lookups therefore
//! need no synchronization.

use std::collections::HashMap;
use std::sync::Arc;

use axum::response::Response;

use crate::failure::Failure;
use crate::problem::classify::{self, Classification, FailureCategory};
use crate::problem::payload::build_problem;

/// Request context threaded into failure handlers: the correlation id plus
/// the request coordinates for the log record.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Per-request correlation identifier.
    pub trace_id: String,
    /// HTTP method of the failing request.
    pub method: String,
    /// Path of the failing request.
    pub path: String,
}

/// Renders a classified failure into a response.
pub type FailureHandler = Arc<dyn Fn(&Classification, &RequestContext) -> Response + Send + Sync>;

/// Maps failure categories to handler closures.
#[derive(Clone, Default)]
pub struct ExceptionRegistry {
    handlers: HashMap<FailureCategory, FailureHandler>,
}

impl ExceptionRegistry {
    /// Create an empty registry. Unregistered categories fall back to the
    /// `Unhandled` handler, or to the built-in problem renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the default problem renderer registered for
    /// every category.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let categories = [
            FailureCategory::Validation,
            FailureCategory::Authentication,
            FailureCategory::Authorization,
            FailureCategory::Conflict,
            FailureCategory::NotFound,
            FailureCategory::DatabaseIntegrity,
            FailureCategory::DatabaseGeneric,
            FailureCategory::DomainError,
            FailureCategory::Unhandled,
        ];
        for category in categories {
            registry.register(category, Arc::new(default_handler));
        }
        registry
    }

    /// Register a handler for a category.
    ///
    /// Idempotent: re-registering replaces the previous handler without
    /// error, which lets test setups stub individual handlers.
    pub fn register(&mut self, category: FailureCategory, handler: FailureHandler) {
        self.handlers.insert(category, handler);
    }

    /// Classify a failure, emit its one log record, and render the response
    /// through the most specific registered handler.
    ///
    /// Called exactly once per failing request by the error boundary; the
    /// registry itself never retries or re-dispatches.
    pub fn dispatch(&self, failure: &Failure, ctx: &RequestContext) -> Response {
        let classification = classify::classify(failure);
        classify::emit_log(failure, &classification, ctx);

        let handler = self
            .handlers
            .get(&classification.category)
            .or_else(|| self.handlers.get(&FailureCategory::Unhandled));
        match handler {
            Some(handler) => handler(&classification, ctx),
            None => default_handler(&classification, ctx),
        }
    }
}

/// The standard pipeline: classification → problem payload.
fn default_handler(classification: &Classification, ctx: &RequestContext) -> Response {
    use axum::response::IntoResponse;

    build_problem(
        classification.category,
        classification.status,
        &classification.errors,
        Some(&ctx.trace_id),
    )
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use keystone_core::error::AppError;

    fn ctx() -> RequestContext {
        RequestContext {
            trace_id: "trace-1".to_string(),
            method: "GET".to_string(),
            path: "/widgets".to_string(),
        }
    }

    #[test]
    fn defaults_render_a_problem_response() {
        let registry = ExceptionRegistry::with_defaults();
        let response = registry.dispatch(&Failure::from(AppError::conflict("taken")), &ctx());
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn registration_is_idempotent_and_replaces() {
        let mut registry = ExceptionRegistry::with_defaults();
        registry.register(
            FailureCategory::DomainError,
            Arc::new(|_: &Classification, _: &RequestContext| {
                use axum::response::IntoResponse;
                (StatusCode::CONFLICT, "stubbed").into_response()
            }),
        );
        let response = registry.dispatch(&Failure::from(AppError::conflict("taken")), &ctx());
        assert_eq!(response.status(), StatusCode::CONFLICT);
        // Replacing again must not error and must take effect.
        registry.register(FailureCategory::DomainError, Arc::new(default_handler));
        let response = registry.dispatch(&Failure::from(AppError::conflict("taken")), &ctx());
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn missing_category_falls_back_to_unhandled_handler() {
        let mut registry = ExceptionRegistry::new();
        registry.register(
            FailureCategory::Unhandled,
            Arc::new(|classification: &Classification, _: &RequestContext| {
                use axum::response::IntoResponse;
                // Render with the classification's own status to prove the
                // fallback still sees the specific classification.
                classification.status.into_response()
            }),
        );
        let response = registry.dispatch(
            &Failure::http(StatusCode::NOT_FOUND, "gone"),
            &ctx(),
        );
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn empty_registry_uses_the_builtin_renderer() {
        let registry = ExceptionRegistry::new();
        let response = registry.dispatch(&Failure::unhandled("boom"), &ctx());
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
