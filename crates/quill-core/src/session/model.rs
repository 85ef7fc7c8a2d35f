//! Session domain model.
//!
//! The `Session` is the single process-wide mutable root: the active workflow
//! plan, the ordered saved articles, and the in-progress draft. This is the
//! "pure" domain model that business logic operates on, independent of any
//! specific storage format.

use crate::workflow::WorkflowPlan;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A persisted session older than this is discarded on load, never merged.
pub const SESSION_MAX_AGE_HOURS: i64 = 24;

/// The in-progress, unsaved working article fields.
///
/// Distinct from the `articles` sequence: a draft only becomes an [`Article`]
/// through the save operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub meta_title: String,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub inline_images: Vec<String>,
}

impl Draft {
    /// Whether the draft holds a publishable article (title and content set).
    pub fn is_publishable(&self) -> bool {
        !self.title.trim().is_empty() && !self.content.trim().is_empty()
    }

    /// Clears only the image fields, keeping title/content/keyword fields for
    /// backward-compatible single-article callers.
    pub fn clear_images(&mut self) {
        self.cover_image_url = None;
        self.inline_images.clear();
    }
}

/// A saved unit of content.
///
/// Created only by the save operation. Mutated only by publish outcomes and
/// removal; once `published` is true it never reverts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Opaque unique identifier, generated at save time
    pub id: String,
    pub title: String,
    /// Markdown body
    pub content: String,
    pub keywords: Vec<String>,
    pub meta_description: String,
    pub meta_title: String,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub inline_images: Vec<String>,
    /// Whitespace-token count of `content`, recomputed at save time
    pub word_count: usize,
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub published: bool,
    /// Lowercased names of platforms this article was delivered to
    #[serde(default)]
    pub published_to: Vec<String>,
    /// Stamped once, on the unpublished-to-published transition
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

/// Counts whitespace-delimited tokens.
pub fn word_count(content: &str) -> usize {
    content.split_whitespace().count()
}

/// The single mutable root tracking the active plan, saved articles, and the
/// working draft across process restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub current_workflow: Option<WorkflowPlan>,
    /// Insertion order is display order; external references are 1-based
    #[serde(default)]
    pub articles: Vec<Article>,
    #[serde(default)]
    pub draft: Draft,
    /// Last content folder written to disk
    #[serde(default)]
    pub content_folder: Option<PathBuf>,
    /// Set on every persist; drives the 24h expiry check on load
    pub saved_at: DateTime<Utc>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            current_workflow: None,
            articles: Vec::new(),
            draft: Draft::default(),
            content_folder: None,
            saved_at: Utc::now(),
        }
    }
}

impl Session {
    /// Whether a persisted `saved_at` is too old to restore.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.saved_at > chrono::Duration::hours(SESSION_MAX_AGE_HOURS)
    }

    /// Looks up an article by 1-based display index.
    pub fn article_at(&self, display_index: usize) -> Option<&Article> {
        if display_index == 0 {
            return None;
        }
        self.articles.get(display_index - 1)
    }
}
