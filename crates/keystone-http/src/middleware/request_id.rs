//! Trace-id middleware.
//!
//! Assigns every request a correlation identifier, stores it in the request
//! extensions for downstream consumers (logging, the error boundary), and
//! echoes it back in the response headers.

use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::state::AppState;

/// Header carrying the correlation identifier.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Per-request correlation identifier, stored in request extensions.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Generate or propagate the request id.
///
/// An incoming `X-Request-ID` header is honored only when
/// `server.trust_request_id` is enabled; otherwise a fresh UUIDv4 is
/// generated so clients cannot forge correlation ids in the logs.
pub async fn propagate_request_id(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let incoming = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_owned);

    let trace_id = match incoming {
        Some(id) if state.config.server.trust_request_id => id,
        _ => Uuid::new_v4().to_string(),
    };

    request.extensions_mut().insert(RequestId(trace_id.clone()));

    let mut response = next.run(request).await;
    if !response.headers().contains_key(REQUEST_ID_HEADER) {
        if let Ok(value) = HeaderValue::from_str(&trace_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
    }
    response
}
