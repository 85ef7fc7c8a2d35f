//! Storage primitives for quill configuration and state files.

mod atomic_json;
mod config_storage;
mod secret_storage;

pub use atomic_json::{AtomicJsonError, AtomicJsonFile};
pub use config_storage::ProjectConfigStorage;
pub use secret_storage::{SecretStorage, SecretStorageError};
