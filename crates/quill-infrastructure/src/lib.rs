//! Quill infrastructure layer.
//!
//! Filesystem-backed persistence for the core domain: atomic JSON storage,
//! the session repository with its 24h expiry rule, credential and project
//! configuration storage, and the per-article content mirror.

pub mod content_store;
pub mod memory_repository;
pub mod paths;
pub mod session_repository;
pub mod storage;

pub use content_store::{ArticleMetadata, ContentStore, SavedContent, SavedContentEntry, slugify};
pub use memory_repository::MemorySessionRepository;
pub use paths::QuillPaths;
pub use session_repository::JsonSessionRepository;
pub use storage::{AtomicJsonFile, ProjectConfigStorage, SecretStorage};
