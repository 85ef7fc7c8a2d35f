//! In-memory session repository.
//!
//! A repository double for tests and ephemeral runs where nothing should
//! touch the filesystem. Mirrors the contract of `JsonSessionRepository`
//! minus the expiry rule (an in-memory session never outlives the process).

use async_trait::async_trait;
use quill_core::Result;
use quill_core::session::{Session, SessionRepository};
use std::sync::Mutex;

/// Keeps the persisted session in process memory.
#[derive(Default)]
pub struct MemorySessionRepository {
    stored: Mutex<Option<Session>>,
}

impl MemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently "persisted" session, if any.
    pub fn stored(&self) -> Option<Session> {
        self.stored.lock().expect("repository lock poisoned").clone()
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn load(&self) -> Result<Option<Session>> {
        Ok(self.stored())
    }

    async fn save(&self, session: &Session) -> Result<()> {
        *self.stored.lock().expect("repository lock poisoned") = Some(session.clone());
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        *self.stored.lock().expect("repository lock poisoned") = None;
        Ok(())
    }
}
