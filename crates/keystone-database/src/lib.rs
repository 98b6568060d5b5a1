//! # keystone-database
//!
//! PostgreSQL access layer for Keystone: connection pool management with
//! a startup wait, and the persistence failure taxonomy that separates
//! integrity violations from generic database failures.

pub mod connection;
pub mod error;

pub use connection::DatabasePool;
pub use error::DbError;
