//! Request middleware: trace-id propagation, the error boundary, security
//! headers, CORS, and request logging.

pub mod cors;
pub mod error_boundary;
pub mod logging;
pub mod request_id;
pub mod security_headers;
