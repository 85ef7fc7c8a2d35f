//! JSON file session repository.
//!
//! Persists the single session as `session.json` through the atomic write
//! primitive, and enforces the 24h expiry rule on load: an expired session
//! is discarded wholesale, never merged or partially restored.

use crate::storage::AtomicJsonFile;
use async_trait::async_trait;
use chrono::Utc;
use quill_core::Result;
use quill_core::session::{Session, SessionRepository};
use std::path::PathBuf;

/// Session persistence backed by a single JSON file.
pub struct JsonSessionRepository {
    file: AtomicJsonFile<Session>,
}

impl JsonSessionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicJsonFile::new(path),
        }
    }
}

#[async_trait]
impl SessionRepository for JsonSessionRepository {
    async fn load(&self) -> Result<Option<Session>> {
        let Some(session) = self.file.load()? else {
            return Ok(None);
        };

        let now = Utc::now();
        if session.is_expired(now) {
            tracing::warn!(
                target: "session",
                saved_at = %session.saved_at,
                "persisted session has expired; discarding"
            );
            return Ok(None);
        }
        Ok(Some(session))
    }

    async fn save(&self, session: &Session) -> Result<()> {
        self.file.save(session)?;
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        self.file.delete()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn repository(dir: &TempDir) -> JsonSessionRepository {
        JsonSessionRepository::new(dir.path().join("session.json"))
    }

    #[tokio::test]
    async fn fresh_session_round_trips() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir);

        let session = Session::default();
        repo.save(&session).await.unwrap();

        let loaded = repo.load().await.unwrap().unwrap();
        assert_eq!(loaded, session);
    }

    #[tokio::test]
    async fn session_older_than_24_hours_is_never_restored() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir);

        let mut session = Session::default();
        session.saved_at = Utc::now() - Duration::hours(25);
        repo.save(&session).await.unwrap();

        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn session_just_inside_the_window_is_restored() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir);

        let mut session = Session::default();
        session.saved_at = Utc::now() - Duration::hours(23);
        repo.save(&session).await.unwrap();

        assert!(repo.load().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn missing_file_loads_as_none() {
        let dir = TempDir::new().unwrap();
        assert!(repository(&dir).load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_removes_the_file() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir);

        repo.save(&Session::default()).await.unwrap();
        repo.delete().await.unwrap();
        assert!(repo.load().await.unwrap().is_none());

        // Deleting again is not an error
        repo.delete().await.unwrap();
    }
}
