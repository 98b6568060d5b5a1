//! Application error type for Keystone.
//!
//! [`AppError`] is the domain-error contract used across the entire
//! application: every error carries a kind (which fixes the HTTP status it
//! translates to), a public message, and a declared log severity. Crates map
//! their internal errors into `AppError` for propagation through the `?`
//! operator; the HTTP layer translates it into a problem+json response.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization.
///
/// Each kind maps to exactly one HTTP status code from the supported set, so
/// an `AppError` can never produce a status outside the response table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Input validation failed.
    Validation,
    /// Authentication failed (missing or invalid credentials).
    Authentication,
    /// The caller does not have permission to perform the action.
    Authorization,
    /// The requested resource was not found.
    NotFound,
    /// A conflict occurred (duplicate entry, concurrent modification, etc.).
    Conflict,
    /// An internal error occurred.
    Internal,
}

impl ErrorKind {
    /// The HTTP status code this kind translates to.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::Authentication => 401,
            Self::Authorization => 403,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::Internal => 500,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "VALIDATION"),
            Self::Authentication => write!(f, "AUTHENTICATION"),
            Self::Authorization => write!(f, "AUTHORIZATION"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// Log severity declared by the error author.
///
/// Domain errors are expected conditions; authors can downgrade them to
/// `Info` when an occurrence is routine and should not raise alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Severity {
    /// Routine occurrence, logged at info level.
    Info,
    /// Noteworthy occurrence, logged at warn level.
    Warning,
}

/// The unified application error used throughout Keystone.
///
/// The message is considered public: it originates in application code, not
/// in infrastructure, and may be shown to API clients verbatim.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable, client-safe error message.
    pub message: String,
    /// Declared log severity.
    pub severity: Severity,
    /// Optional underlying cause. Never exposed to clients.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            severity: Severity::Warning,
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            severity: Severity::Warning,
            source: Some(Box::new(source)),
        }
    }

    /// Override the declared log severity.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    /// Create an authorization error.
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authorization, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// The HTTP status code declared by this error.
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            severity: self.severity,
            source: None,
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Internal,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_maps_to_supported_status_codes() {
        assert_eq!(ErrorKind::Validation.status_code(), 400);
        assert_eq!(ErrorKind::Authentication.status_code(), 401);
        assert_eq!(ErrorKind::Authorization.status_code(), 403);
        assert_eq!(ErrorKind::NotFound.status_code(), 404);
        assert_eq!(ErrorKind::Conflict.status_code(), 409);
        assert_eq!(ErrorKind::Internal.status_code(), 500);
    }

    #[test]
    fn constructors_set_kind_and_message() {
        let err = AppError::conflict("Slug already taken");
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.message, "Slug already taken");
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.severity, Severity::Warning);
    }

    #[test]
    fn severity_can_be_downgraded() {
        let err = AppError::not_found("No such page").with_severity(Severity::Info);
        assert_eq!(err.severity, Severity::Info);
    }

    #[test]
    fn display_includes_kind_and_message() {
        let err = AppError::authentication("Unauthorized");
        assert_eq!(err.to_string(), "AUTHENTICATION: Unauthorized");
    }
}
