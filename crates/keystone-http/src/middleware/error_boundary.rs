//! The single place where failures become responses.
//!
//! Handlers that return `Err(Failure)` produce a placeholder response with
//! the failure parked in its extensions (see
//! [`Failure::into_response`](crate::failure::Failure)). This middleware
//! removes the parked failure and routes it through the exception registry
//! exactly once, with the request's trace id attached. Responses without a
//! parked failure pass through untouched.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::failure::CaughtFailure;
use crate::middleware::request_id::RequestId;
use crate::problem::registry::RequestContext;
use crate::state::AppState;

/// Catch a parked failure and render it through the registry.
pub async fn error_boundary(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let trace_id = request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;

    // Removing the extension guarantees exactly-once dispatch even if the
    // response is inspected again further up the stack.
    if let Some(CaughtFailure(failure)) = response.extensions_mut().remove::<CaughtFailure>() {
        let ctx = RequestContext {
            trace_id,
            method,
            path,
        };
        return state.registry.dispatch(failure.as_ref(), &ctx);
    }
    response
}
