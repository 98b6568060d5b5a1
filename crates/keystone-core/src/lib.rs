//! # keystone-core
//!
//! Core crate for Keystone. Contains configuration schemas, the
//! application error type, and the shared result alias.
//!
//! This crate has **no** internal dependencies on other Keystone crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
