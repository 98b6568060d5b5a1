//! RFC 9110 problem+json payload construction.

use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::problem::classify::FailureCategory;

/// Content type for problem responses.
pub const MEDIA_TYPE: &str = "application/problem+json";

/// RFC 9110 problem details body.
///
/// Constructed fresh per request by [`build_problem`], never mutated after
/// construction, and serialized directly into the response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI reference identifying the error type.
    #[serde(rename = "type")]
    pub type_uri: String,
    /// Short human-readable summary (the HTTP reason phrase).
    pub title: String,
    /// HTTP status code.
    pub status: u16,
    /// Field-or-category name → ordered message list.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub errors: Map<String, Value>,
    /// Per-request correlation identifier.
    #[serde(rename = "traceId", default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            [(header::CONTENT_TYPE, MEDIA_TYPE)],
            Json(self),
        )
            .into_response()
    }
}

/// Build a problem payload from a classification result.
///
/// Pure and deterministic: identical arguments (including `trace_id`)
/// produce byte-identical serialized output. When `errors` is empty a
/// single default entry keyed by the category's public label is inserted,
/// e.g. `{"Error": ["Internal error"]}` for the redacted 500 categories.
pub fn build_problem(
    category: FailureCategory,
    status: StatusCode,
    errors: &[(String, Vec<String>)],
    trace_id: Option<&str>,
) -> ProblemDetails {
    let mut map = Map::new();
    if errors.is_empty() {
        map.insert(
            category.public_label().to_string(),
            Value::Array(vec![Value::String(default_message(status))]),
        );
    } else {
        for (key, messages) in errors {
            map.insert(
                key.clone(),
                Value::Array(messages.iter().map(|m| Value::String(m.clone())).collect()),
            );
        }
    }

    ProblemDetails {
        type_uri: type_for_status(status),
        title: title_for_status(status),
        status: status.as_u16(),
        errors: map,
        trace_id: trace_id.map(str::to_owned),
    }
}

/// RFC 9110 documentation anchor for a status code.
fn type_for_status(status: StatusCode) -> String {
    let anchor = match status {
        StatusCode::BAD_REQUEST => "name-400-bad-request",
        StatusCode::UNAUTHORIZED => "name-401-unauthorized",
        StatusCode::FORBIDDEN => "name-403-forbidden",
        StatusCode::NOT_FOUND => "name-404-not-found",
        StatusCode::CONFLICT => "name-409-conflict",
        StatusCode::UNPROCESSABLE_ENTITY => "name-422-unprocessable-content",
        StatusCode::INTERNAL_SERVER_ERROR => "name-500-internal-server-error",
        other => {
            return format!(
                "https://www.rfc-editor.org/rfc/rfc9110.html#name-{}",
                other.as_u16()
            );
        }
    };
    format!("https://www.rfc-editor.org/rfc/rfc9110.html#{anchor}")
}

fn title_for_status(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("Error").to_string()
}

/// Default message when the classifier supplies none. The 500 family gets
/// the fixed redaction text rather than the reason phrase.
fn default_message(status: StatusCode) -> String {
    if status.is_server_error() {
        "Internal error".to_string()
    } else {
        title_for_status(status)
    }
}
