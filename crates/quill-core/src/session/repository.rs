//! Session repository trait.
//!
//! Defines the interface for session persistence, decoupling the core logic
//! from the storage mechanism (JSON file, in-memory test double, ...).

use super::model::Session;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for the single persisted session.
///
/// # Implementation notes
///
/// Implementations must:
/// - reject (return `Ok(None)` for) persisted sessions older than the
///   24h expiry window — an expired session is never partially restored
/// - write atomically so a crash mid-save never leaves a torn file
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Loads the persisted session.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Session))`: a fresh session was found
    /// - `Ok(None)`: no session on disk, or the stored one has expired
    /// - `Err(_)`: the file exists but could not be read or parsed
    async fn load(&self) -> Result<Option<Session>>;

    /// Persists the session atomically.
    async fn save(&self, session: &Session) -> Result<()>;

    /// Deletes the persisted session, if any.
    async fn delete(&self) -> Result<()>;
}
