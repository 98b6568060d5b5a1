//! Persistence failure taxonomy.
//!
//! Request-path database failures are collapsed into two recognizable
//! shapes: integrity violations (unique, foreign-key, not-null, check) and
//! everything else. The HTTP layer relies on this split to decide between a
//! 409 response and a redacted 500.

use thiserror::Error;

/// A database failure surfaced from a request-handling query.
///
/// The `detail` and `constraint` fields are internal diagnostics for the
/// log sink; they must never be copied into a client response.
#[derive(Debug, Error)]
pub enum DbError {
    /// An integrity or uniqueness constraint was violated.
    #[error("integrity violation: {detail}")]
    Integrity {
        /// Name of the violated constraint, when the driver reports one.
        constraint: Option<String>,
        /// Full driver error text. Log sink only.
        detail: String,
        /// Optional business message supplied by the caller, safe to show
        /// to clients in place of the fixed "Already exists" text.
        message: Option<String>,
    },
    /// Any other database failure.
    #[error("database failure: {detail}")]
    Generic {
        /// Full driver error text. Log sink only.
        detail: String,
    },
}

impl DbError {
    /// Attach a client-safe business message to an integrity violation.
    ///
    /// Has no effect on generic failures, which stay fully redacted.
    pub fn with_public_message(self, message: impl Into<String>) -> Self {
        match self {
            Self::Integrity {
                constraint, detail, ..
            } => Self::Integrity {
                constraint,
                detail,
                message: Some(message.into()),
            },
            other => other,
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            match db.kind() {
                sqlx::error::ErrorKind::UniqueViolation
                | sqlx::error::ErrorKind::ForeignKeyViolation
                | sqlx::error::ErrorKind::NotNullViolation
                | sqlx::error::ErrorKind::CheckViolation => {
                    return Self::Integrity {
                        constraint: db.constraint().map(str::to_owned),
                        detail: db.to_string(),
                        message: None,
                    };
                }
                _ => {}
            }
        }
        Self::Generic {
            detail: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_map_to_generic() {
        let err = DbError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, DbError::Generic { .. }));

        let err = DbError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, DbError::Generic { .. }));
    }

    #[test]
    fn public_message_only_applies_to_integrity() {
        let err = DbError::Integrity {
            constraint: Some("users_email_key".to_string()),
            detail: "duplicate key value".to_string(),
            message: None,
        }
        .with_public_message("Email already registered");
        match err {
            DbError::Integrity { message, .. } => {
                assert_eq!(message.as_deref(), Some("Email already registered"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }

        let err = DbError::Generic {
            detail: "connection reset".to_string(),
        }
        .with_public_message("should be ignored");
        assert!(matches!(err, DbError::Generic { .. }));
    }
}
