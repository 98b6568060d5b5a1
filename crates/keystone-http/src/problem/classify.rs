//! Failure classification.
//!
//! An explicit, ordered list of predicates inspects a [`Failure`] and
//! assigns it a category, an HTTP status, and the client-safe message map.
//! The first matching predicate wins; the ordering is part of the contract
//! because a failure value may structurally satisfy more than one check.

use axum::http::StatusCode;
use tracing::{error, info, warn};

use keystone_core::error::Severity;
use keystone_database::error::DbError;

use crate::failure::Failure;
use crate::problem::registry::RequestContext;

/// Category assigned to a failure at classification time. Immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureCategory {
    /// Structural request validation failed.
    Validation,
    /// Authentication failed.
    Authentication,
    /// The caller lacks permission.
    Authorization,
    /// An HTTP-level conflict.
    Conflict,
    /// The resource does not exist.
    NotFound,
    /// An integrity or uniqueness constraint was violated.
    DatabaseIntegrity,
    /// Any other persistence-layer failure. Always redacted.
    DatabaseGeneric,
    /// An application-defined domain error.
    DomainError,
    /// Anything unmatched. Always redacted.
    Unhandled,
}

impl FailureCategory {
    /// The key used in the `errors` map when the classifier supplies no
    /// field-specific messages.
    pub fn public_label(&self) -> &'static str {
        match self {
            Self::Validation => "Validation",
            Self::Authentication => "Authentication",
            Self::Authorization => "Authorization",
            Self::Conflict => "Conflict",
            Self::NotFound => "NotFound",
            Self::DatabaseIntegrity => "Conflict",
            Self::DatabaseGeneric => "Error",
            Self::DomainError => "Error",
            Self::Unhandled => "Error",
        }
    }
}

impl std::fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "VALIDATION"),
            Self::Authentication => write!(f, "AUTHENTICATION"),
            Self::Authorization => write!(f, "AUTHORIZATION"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::DatabaseIntegrity => write!(f, "DATABASE_INTEGRITY"),
            Self::DatabaseGeneric => write!(f, "DATABASE_GENERIC"),
            Self::DomainError => write!(f, "DOMAIN_ERROR"),
            Self::Unhandled => write!(f, "UNHANDLED"),
        }
    }
}

/// Result of classifying a failure.
///
/// `errors` holds only client-safe text: every entry has passed the
/// predicate's allow-list. An empty map means "use the category default".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Assigned category.
    pub category: FailureCategory,
    /// HTTP status to respond with.
    pub status: StatusCode,
    /// Ordered field-or-category → messages pairs for the client.
    pub errors: Vec<(String, Vec<String>)>,
}

type Predicate = fn(&Failure) -> Option<Classification>;

/// Classification predicates, most specific first. The relative order of
/// validation, auth, integrity, domain, and generic-database checks is a
/// contract; see the module docs.
const PREDICATES: &[Predicate] = &[
    match_validation,
    match_authentication,
    match_authorization,
    match_database_integrity,
    match_domain,
    match_database_generic,
    match_http,
];

/// Classify a failure. Pure; the log side effect lives in [`emit_log`].
pub fn classify(failure: &Failure) -> Classification {
    PREDICATES
        .iter()
        .find_map(|predicate| predicate(failure))
        .unwrap_or_else(unhandled)
}

fn match_validation(failure: &Failure) -> Option<Classification> {
    let Failure::Validation(violations) = failure else {
        return None;
    };
    Some(Classification {
        category: FailureCategory::Validation,
        status: StatusCode::UNPROCESSABLE_ENTITY,
        errors: violations
            .iter()
            .map(|v| (v.field.clone(), v.messages.clone()))
            .collect(),
    })
}

fn match_authentication(failure: &Failure) -> Option<Classification> {
    match failure {
        Failure::Http { status, .. } if *status == StatusCode::UNAUTHORIZED => {
            Some(Classification {
                category: FailureCategory::Authentication,
                status: StatusCode::UNAUTHORIZED,
                errors: single_entry("Authentication", "Unauthorized"),
            })
        }
        _ => None,
    }
}

fn match_authorization(failure: &Failure) -> Option<Classification> {
    match failure {
        Failure::Http { status, .. } if *status == StatusCode::FORBIDDEN => Some(Classification {
            category: FailureCategory::Authorization,
            status: StatusCode::FORBIDDEN,
            errors: single_entry("Authorization", "Forbidden"),
        }),
        _ => None,
    }
}

fn match_database_integrity(failure: &Failure) -> Option<Classification> {
    let Failure::Database(DbError::Integrity { message, .. }) = failure else {
        return None;
    };
    // The fixed text or a caller-supplied business message. Never the
    // constraint name or driver detail.
    let public = message.clone().unwrap_or_else(|| "Already exists".to_string());
    Some(Classification {
        category: FailureCategory::DatabaseIntegrity,
        status: StatusCode::CONFLICT,
        errors: single_entry("Conflict", public),
    })
}

fn match_domain(failure: &Failure) -> Option<Classification> {
    let Failure::Domain(err) = failure else {
        return None;
    };
    let status = StatusCode::from_u16(err.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Some(Classification {
        category: FailureCategory::DomainError,
        status,
        errors: single_entry(label_for_status(status), err.message.clone()),
    })
}

fn match_database_generic(failure: &Failure) -> Option<Classification> {
    let Failure::Database(DbError::Generic { .. }) = failure else {
        return None;
    };
    // Redacted: the payload builder fills in {"Error": ["Internal error"]}.
    Some(Classification {
        category: FailureCategory::DatabaseGeneric,
        status: StatusCode::INTERNAL_SERVER_ERROR,
        errors: Vec::new(),
    })
}

fn match_http(failure: &Failure) -> Option<Classification> {
    let Failure::Http { status, detail } = failure else {
        return None;
    };
    let category = match *status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => FailureCategory::Validation,
        StatusCode::NOT_FOUND => FailureCategory::NotFound,
        StatusCode::CONFLICT => FailureCategory::Conflict,
        // Statuses outside the response table fall through to Unhandled.
        _ => return None,
    };
    let errors = if detail.is_empty() {
        Vec::new()
    } else {
        single_entry(category.public_label(), detail.clone())
    };
    Some(Classification {
        category,
        status: *status,
        errors,
    })
}

fn unhandled() -> Classification {
    Classification {
        category: FailureCategory::Unhandled,
        status: StatusCode::INTERNAL_SERVER_ERROR,
        errors: Vec::new(),
    }
}

fn single_entry(key: impl Into<String>, message: impl Into<String>) -> Vec<(String, Vec<String>)> {
    vec![(key.into(), vec![message.into()])]
}

fn label_for_status(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => "Validation",
        StatusCode::UNAUTHORIZED => "Authentication",
        StatusCode::FORBIDDEN => "Authorization",
        StatusCode::NOT_FOUND => "NotFound",
        StatusCode::CONFLICT => "Conflict",
        _ => "Error",
    }
}

/// Emit the one structured log record for a classified failure.
///
/// This is the only place the full internal detail (driver text, constraint
/// names, source chains) is written; it never reaches the response body.
pub fn emit_log(failure: &Failure, classification: &Classification, ctx: &RequestContext) {
    let category = classification.category;
    let status = classification.status.as_u16();
    match category {
        FailureCategory::DatabaseGeneric | FailureCategory::Unhandled => {
            error!(
                %category,
                status,
                trace_id = %ctx.trace_id,
                method = %ctx.method,
                path = %ctx.path,
                detail = ?failure,
                "request failed"
            );
        }
        FailureCategory::DomainError => {
            let severity = match failure {
                Failure::Domain(err) => err.severity,
                _ => Severity::Warning,
            };
            match severity {
                Severity::Info => info!(
                    %category,
                    status,
                    trace_id = %ctx.trace_id,
                    method = %ctx.method,
                    path = %ctx.path,
                    detail = ?failure,
                    "request failed"
                ),
                Severity::Warning => warn!(
                    %category,
                    status,
                    trace_id = %ctx.trace_id,
                    method = %ctx.method,
                    path = %ctx.path,
                    detail = ?failure,
                    "request failed"
                ),
            }
        }
        _ => {
            warn!(
                %category,
                status,
                trace_id = %ctx.trace_id,
                method = %ctx.method,
                path = %ctx.path,
                detail = ?failure,
                "request failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::FieldViolation;
    use keystone_core::error::AppError;

    #[test]
    fn validation_preserves_field_order_and_messages() {
        let failure = Failure::Validation(vec![
            FieldViolation::new("email", "Field required"),
            FieldViolation {
                field: "age".to_string(),
                messages: vec!["Must be positive".to_string(), "Must be < 200".to_string()],
            },
        ]);
        let c = classify(&failure);
        assert_eq!(c.category, FailureCategory::Validation);
        assert_eq!(c.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(c.errors.len(), 2);
        assert_eq!(c.errors[0].0, "email");
        assert_eq!(c.errors[1].0, "age");
        assert_eq!(c.errors[1].1.len(), 2);
    }

    #[test]
    fn http_statuses_map_to_auth_categories() {
        let c = classify(&Failure::http(StatusCode::UNAUTHORIZED, "token expired"));
        assert_eq!(c.category, FailureCategory::Authentication);
        assert_eq!(c.status, StatusCode::UNAUTHORIZED);
        // The generic message, not the handler detail.
        assert_eq!(c.errors, vec![(
            "Authentication".to_string(),
            vec!["Unauthorized".to_string()]
        )]);

        let c = classify(&Failure::http(StatusCode::FORBIDDEN, "missing role"));
        assert_eq!(c.category, FailureCategory::Authorization);
        assert_eq!(c.errors[0].1, vec!["Forbidden"]);
    }

    #[test]
    fn integrity_violation_is_a_conflict_with_fixed_message() {
        let failure = Failure::Database(DbError::Integrity {
            constraint: Some("users_email_key".to_string()),
            detail: "duplicate key value violates unique constraint \"users_email_key\""
                .to_string(),
            message: None,
        });
        let c = classify(&failure);
        assert_eq!(c.category, FailureCategory::DatabaseIntegrity);
        assert_eq!(c.status, StatusCode::CONFLICT);
        assert_eq!(c.errors, vec![(
            "Conflict".to_string(),
            vec!["Already exists".to_string()]
        )]);
    }

    #[test]
    fn integrity_violation_prefers_business_message() {
        let failure = Failure::Database(
            DbError::Integrity {
                constraint: None,
                detail: "duplicate key".to_string(),
                message: None,
            }
            .with_public_message("Email already registered"),
        );
        let c = classify(&failure);
        assert_eq!(c.errors[0].1, vec!["Email already registered"]);
    }

    #[test]
    fn domain_error_uses_declared_status_and_message() {
        let c = classify(&Failure::from(AppError::conflict("Slug already taken")));
        assert_eq!(c.category, FailureCategory::DomainError);
        assert_eq!(c.status, StatusCode::CONFLICT);
        assert_eq!(c.errors, vec![(
            "Conflict".to_string(),
            vec!["Slug already taken".to_string()]
        )]);

        let c = classify(&Failure::from(AppError::not_found("No such article")));
        assert_eq!(c.status, StatusCode::NOT_FOUND);
        assert_eq!(c.errors[0].0, "NotFound");
    }

    #[test]
    fn generic_database_failures_are_redacted() {
        let failure = Failure::Database(DbError::Generic {
            detail: "connection reset while executing SELECT * FROM users".to_string(),
        });
        let c = classify(&failure);
        assert_eq!(c.category, FailureCategory::DatabaseGeneric);
        assert_eq!(c.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(c.errors.is_empty());
    }

    #[test]
    fn unrecognized_failures_are_redacted() {
        let c = classify(&Failure::unhandled("attempted to dereference a null pointer"));
        assert_eq!(c.category, FailureCategory::Unhandled);
        assert_eq!(c.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(c.errors.is_empty());
    }

    #[test]
    fn http_statuses_outside_the_table_become_unhandled() {
        let c = classify(&Failure::http(StatusCode::IM_A_TEAPOT, "short and stout"));
        assert_eq!(c.category, FailureCategory::Unhandled);
        assert_eq!(c.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(c.errors.is_empty());
    }

    #[test]
    fn every_status_is_in_the_supported_table() {
        let supported = [400u16, 401, 403, 404, 409, 422, 500];
        let failures = [
            Failure::Validation(vec![FieldViolation::new("a", "b")]),
            Failure::http(StatusCode::UNAUTHORIZED, ""),
            Failure::http(StatusCode::FORBIDDEN, ""),
            Failure::http(StatusCode::NOT_FOUND, "gone"),
            Failure::http(StatusCode::CONFLICT, "busy"),
            Failure::http(StatusCode::BAD_REQUEST, "bad"),
            Failure::http(StatusCode::PAYLOAD_TOO_LARGE, "big"),
            Failure::Database(DbError::Generic {
                detail: "boom".to_string(),
            }),
            Failure::from(AppError::validation("nope")),
            Failure::unhandled("?"),
        ];
        for failure in &failures {
            let c = classify(failure);
            assert!(
                supported.contains(&c.status.as_u16()),
                "unsupported status {} for {failure:?}",
                c.status
            );
        }
    }
}
