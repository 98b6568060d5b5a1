//! # keystone-http
//!
//! HTTP layer for Keystone using Axum. Hosts the error-classification and
//! problem+json response pipeline, request middleware (trace id, security
//! headers, request logging, error boundary), health handlers, and the
//! application wiring.

pub mod app;
pub mod extract;
pub mod failure;
pub mod handlers;
pub mod middleware;
pub mod problem;
pub mod router;
pub mod state;

pub use failure::Failure;
pub use problem::payload::ProblemDetails;
pub use problem::registry::ExceptionRegistry;
