//! Quill core domain layer.
//!
//! Pure domain types and logic for multi-step, multi-article content
//! production: the workflow plan builder, the lock-guarded session store,
//! publish report types, and the capability traits external integrations
//! implement. Persistence and HTTP live in `quill-infrastructure` and
//! `quill-interaction`.

pub mod config;
pub mod error;
pub mod integration;
pub mod publish;
pub mod session;
pub mod workflow;

// Re-export common error type
pub use error::{QuillError, Result};
