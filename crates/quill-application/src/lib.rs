//! Quill application layer.
//!
//! Use cases composing the core domain with infrastructure: workflow
//! creation with integration detection, session editing with the content
//! mirror, the batch publish coordinator, and plain-text presentation of
//! the resulting data.

pub mod presenter;
pub mod publish_usecase;
pub mod session_usecase;
pub mod workflow_usecase;

pub use publish_usecase::{DRAFT_SENTINEL_ID, PublishUseCase, inject_inline_images};
pub use session_usecase::{
    ArticleSummary, ClearOutcome, SavedArticle, SessionSnapshot, SessionUseCase, WorkflowSummary,
};
pub use workflow_usecase::{CreateWorkflowOutcome, WorkflowUseCase};
