//! The failure funnel for request handling.
//!
//! Every error that escapes a handler is expressed as a [`Failure`] and
//! caught exactly once by the error-boundary middleware, which runs it
//! through the [`ExceptionRegistry`](crate::problem::registry::ExceptionRegistry).
//! Handlers return `Result<_, Failure>` and rely on the `From` conversions
//! below with the `?` operator.

use std::fmt;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use keystone_core::error::AppError;
use keystone_database::error::DbError;

/// One invalid field together with its human-readable messages.
///
/// Field names and messages originate from request validation and are safe
/// to expose to clients verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Name of the offending field.
    pub field: String,
    /// Ordered list of messages for this field. Never empty.
    pub messages: Vec<String>,
}

impl FieldViolation {
    /// Create a violation with a single message.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            messages: vec![message.into()],
        }
    }
}

/// A failure raised during request processing.
///
/// The variants mirror the failure sources the classifier understands:
/// framework-level HTTP errors, request validation, the persistence layer,
/// application domain errors, and anything unrecognized.
#[derive(Debug)]
pub enum Failure {
    /// An HTTP-level error raised by application code (e.g. a handler
    /// rejecting a request outright). The detail is considered safe.
    Http {
        /// HTTP status the handler asked for.
        status: StatusCode,
        /// Client-safe detail message.
        detail: String,
    },
    /// Request-body validation failed. Order is preserved from the source.
    Validation(Vec<FieldViolation>),
    /// The persistence layer failed.
    Database(DbError),
    /// An application-defined domain error carrying its own status,
    /// message, and severity.
    Domain(AppError),
    /// Anything unrecognized. Always rendered as a redacted 500.
    Unhandled(Box<dyn std::error::Error + Send + Sync>),
}

impl Failure {
    /// Create an HTTP-level failure with a client-safe detail message.
    pub fn http(status: StatusCode, detail: impl Into<String>) -> Self {
        Self::Http {
            status,
            detail: detail.into(),
        }
    }

    /// Wrap an unrecognized error.
    pub fn unhandled(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Unhandled(err.into())
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http { status, detail } => write!(f, "http {status}: {detail}"),
            Self::Validation(violations) => {
                write!(f, "validation failed for {} field(s)", violations.len())
            }
            Self::Database(err) => write!(f, "{err}"),
            Self::Domain(err) => write!(f, "{err}"),
            Self::Unhandled(err) => write!(f, "unhandled: {err}"),
        }
    }
}

impl From<AppError> for Failure {
    fn from(err: AppError) -> Self {
        Self::Domain(err)
    }
}

impl From<DbError> for Failure {
    fn from(err: DbError) -> Self {
        Self::Database(err)
    }
}

impl From<sqlx::Error> for Failure {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(DbError::from(err))
    }
}

impl From<validator::ValidationErrors> for Failure {
    fn from(errors: validator::ValidationErrors) -> Self {
        // The validator crate hands fields back in hash order; sort them so
        // the response shape is deterministic.
        let mut fields: Vec<(String, Vec<String>)> = errors
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        Self::Validation(
            fields
                .into_iter()
                .map(|(field, messages)| FieldViolation { field, messages })
                .collect(),
        )
    }
}

/// A failure caught on its way out of a handler, parked in the response
/// extensions for the error-boundary middleware to render.
#[derive(Clone)]
pub struct CaughtFailure(pub Arc<Failure>);

impl IntoResponse for Failure {
    /// Park the failure for the error boundary instead of rendering it.
    ///
    /// The placeholder response is a bare 500 carrying the failure in its
    /// extensions. [`error_boundary`](crate::middleware::error_boundary)
    /// replaces it with the classified problem+json response; if the
    /// boundary is missing from the stack the client sees an empty 500,
    /// which never leaks internals.
    fn into_response(self) -> Response {
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response.extensions_mut().insert(CaughtFailure(Arc::new(self)));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validator_errors_become_sorted_violations() {
        use validator::Validate;

        #[derive(Validate)]
        struct Form {
            #[validate(length(min = 1, message = "Field required"))]
            name: String,
            #[validate(email(message = "Invalid email address"))]
            email: String,
        }

        let form = Form {
            name: String::new(),
            email: "not-an-email".to_string(),
        };
        let failure = Failure::from(form.validate().unwrap_err());
        match failure {
            Failure::Validation(violations) => {
                assert_eq!(violations.len(), 2);
                assert_eq!(violations[0].field, "email");
                assert_eq!(violations[0].messages, vec!["Invalid email address"]);
                assert_eq!(violations[1].field, "name");
                assert_eq!(violations[1].messages, vec!["Field required"]);
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn into_response_parks_the_failure() {
        let response = Failure::http(StatusCode::NOT_FOUND, "gone").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.extensions().get::<CaughtFailure>().is_some());
    }
}
