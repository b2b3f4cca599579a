//! HTTP middleware: request logging and per-request cancellation.

pub mod cancellation;
pub mod logging;

pub use cancellation::inject_cancellation;
pub use logging::{request_logging, request_logging_simple};
