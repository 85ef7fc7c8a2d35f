//! Quill interaction layer.
//!
//! Outbound HTTP: the resilient client every integration routes through,
//! and the REST implementation of the content backend contract.

pub mod backend;
pub mod http;

pub use backend::RestToolExecutor;
pub use http::{DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT, ResilientClient};
