//! Error classification and problem+json response pipeline.
//!
//! Control flow: a [`Failure`](crate::failure::Failure) escapes request
//! handling → the [`registry`](registry::ExceptionRegistry) dispatches it →
//! [`classify`](classify::classify) determines category, status, and
//! client-safe messages → [`build_problem`](payload::build_problem) renders
//! the RFC 9110 problem payload while the full detail goes to the log sink.

pub mod classify;
pub mod payload;
pub mod registry;

pub use classify::{Classification, FailureCategory, classify};
pub use payload::{MEDIA_TYPE, ProblemDetails, build_problem};
pub use registry::{ExceptionRegistry, RequestContext};
