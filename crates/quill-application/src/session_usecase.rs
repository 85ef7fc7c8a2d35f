//! Session use cases.
//!
//! Wraps the session store with the operations a front end calls directly:
//! saving articles (with the on-disk content mirror), removing them,
//! updating the draft, taking read-only snapshots, and resetting the
//! session behind an explicit confirmation gate.

use chrono::{DateTime, Utc};
use quill_core::error::Result;
use quill_core::session::{Article, ArticleInput, DraftUpdate, RemoveOutcome, SessionStore};
use quill_infrastructure::{ContentStore, SavedContent, SavedContentEntry};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Result of saving an article: the stored article plus the mirror folder,
/// when the mirror write succeeded.
#[derive(Debug, Clone)]
pub struct SavedArticle {
    pub article: Article,
    pub folder: Option<PathBuf>,
}

/// Binary outcome of a clear-session request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// The caller must confirm before anything is discarded.
    ConfirmationRequired,
    Cleared,
}

/// Read-only view of the active workflow for display.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowSummary {
    pub id: String,
    pub request: String,
    pub article_count: usize,
    pub step_count: usize,
    pub publish_targets: Vec<String>,
}

/// Read-only view of one saved article for display.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleSummary {
    /// 1-based display index, the same one remove and publish accept
    pub index: usize,
    pub title: String,
    pub word_count: usize,
    pub published: bool,
    pub published_to: Vec<String>,
}

/// Point-in-time, display-oriented view of the session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub workflow: Option<WorkflowSummary>,
    pub articles: Vec<ArticleSummary>,
    /// Whether the working draft holds any content
    pub draft_in_progress: bool,
    pub content_folder: Option<PathBuf>,
    pub saved_at: DateTime<Utc>,
}

/// Session-facing application service.
pub struct SessionUseCase {
    store: Arc<SessionStore>,
    content_store: Arc<ContentStore>,
    project_name: String,
}

impl SessionUseCase {
    pub fn new(
        store: Arc<SessionStore>,
        content_store: Arc<ContentStore>,
        project_name: impl Into<String>,
    ) -> Self {
        Self {
            store,
            content_store,
            project_name: project_name.into(),
        }
    }

    /// Saves an article into the session and mirrors it to disk.
    ///
    /// The session write is the source of truth; a mirror failure is logged
    /// and reported as `folder: None` without undoing the save.
    pub async fn save_article(&self, input: ArticleInput) -> SavedArticle {
        let article = self.store.add_article(input).await;
        let workflow = self.store.snapshot().await.current_workflow;

        let folder = match self
            .content_store
            .save_article(&article, &self.project_name, workflow.as_ref())
        {
            Ok(folder) => {
                self.store.set_content_folder(folder.clone()).await;
                Some(folder)
            }
            Err(err) => {
                tracing::warn!(
                    target: "content",
                    article = %article.title,
                    %err,
                    "content mirror write failed; article kept in session only"
                );
                None
            }
        };

        SavedArticle { article, folder }
    }

    /// Removes articles by 1-based display index.
    pub async fn remove_articles(&self, display_indices: &[usize]) -> RemoveOutcome {
        self.store.remove_articles(display_indices).await
    }

    /// Applies a partial update to the working draft.
    pub async fn update_draft(&self, update: DraftUpdate) {
        self.store.update_draft(update).await;
    }

    /// Builds a display-oriented snapshot of the session.
    pub async fn snapshot(&self) -> SessionSnapshot {
        let session = self.store.snapshot().await;

        let workflow = session.current_workflow.as_ref().map(|plan| WorkflowSummary {
            id: plan.id.clone(),
            request: plan.request.clone(),
            article_count: plan.article_count,
            step_count: plan.steps.len(),
            publish_targets: plan.publish_targets.clone(),
        });

        let articles = session
            .articles
            .iter()
            .enumerate()
            .map(|(i, article)| ArticleSummary {
                index: i + 1,
                title: article.title.clone(),
                word_count: article.word_count,
                published: article.published,
                published_to: article.published_to.clone(),
            })
            .collect();

        SessionSnapshot {
            workflow,
            articles,
            draft_in_progress: !session.draft.title.is_empty()
                || !session.draft.content.is_empty(),
            content_folder: session.content_folder,
            saved_at: session.saved_at,
        }
    }

    /// Clears the whole session. Destructive, so the first call without
    /// `confirm` only asks for confirmation.
    pub async fn clear_session(&self, confirm: bool) -> ClearOutcome {
        if !confirm {
            return ClearOutcome::ConfirmationRequired;
        }
        self.store.reset().await;
        tracing::info!(target: "session", "session cleared");
        ClearOutcome::Cleared
    }

    /// Lists the on-disk content mirror, most recent first.
    pub fn list_saved_content(&self) -> Result<Vec<SavedContentEntry>> {
        self.content_store.list()
    }

    /// Loads one mirrored article by folder name.
    pub fn load_saved_content(&self, folder: &str) -> Result<SavedContent> {
        self.content_store.load(folder)
    }
}
