//! Session domain module.
//!
//! - `model`: the session root and its parts (`Session`, `Article`, `Draft`)
//! - `repository`: persistence trait (`SessionRepository`)
//! - `store`: the lock-guarded mutable container (`SessionStore`)

mod model;
mod repository;
mod store;

pub use model::{Article, Draft, SESSION_MAX_AGE_HOURS, Session, word_count};
pub use repository::SessionRepository;
pub use store::{
    ArticleInput, DraftUpdate, PublishUpdate, RemoveOutcome, SessionStore, SkippedRemoval,
};
