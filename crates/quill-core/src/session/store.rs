//! Lock-guarded session store.
//!
//! `SessionStore` is the single mutable session container per process. Every
//! mutating operation runs under one `tokio::sync::Mutex`, whose FIFO-fair
//! queueing yields a total, deterministic order over session state
//! transitions even when multiple logical callers race.
//!
//! Persistence failures are logged and swallowed: the in-memory state stays
//! authoritative for the rest of the process lifetime even when the on-disk
//! mirror is stale. The lock is advisory and in-process only; two processes
//! sharing one session file still race last-writer-wins (a known limitation
//! of the file-per-session design).

use super::model::{Article, Session, word_count};
use super::repository::SessionRepository;
use crate::error::Result;
use crate::workflow::WorkflowPlan;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Fields accepted by the save-article operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticleInput {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub meta_title: String,
}

/// Partial draft update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DraftUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub meta_description: Option<String>,
    pub meta_title: Option<String>,
    pub cover_image_url: Option<String>,
    pub inline_images: Option<Vec<String>>,
}

/// One skipped entry of a remove-articles request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRemoval {
    /// The 1-based display index the caller asked for
    pub index: usize,
    pub reason: String,
}

/// Structured result of a remove-articles request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveOutcome {
    /// 1-based indices that were removed
    pub removed: Vec<usize>,
    pub skipped: Vec<SkippedRemoval>,
}

/// Publish outcome for one article, applied back onto the session in a
/// single batch mutation.
#[derive(Debug, Clone)]
pub struct PublishUpdate {
    pub article_id: String,
    /// Lowercased names of platforms that succeeded for this article
    pub succeeded_platforms: Vec<String>,
}

/// The lock-guarded, crash-recoverable session container.
pub struct SessionStore {
    state: Mutex<Session>,
    repository: Arc<dyn SessionRepository>,
}

impl SessionStore {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self {
            state: Mutex::new(Session::default()),
            repository,
        }
    }

    /// Restores the persisted session, if one exists and has not expired.
    ///
    /// Read or parse failures are logged and leave the in-memory defaults in
    /// place: a broken file never takes the process down.
    ///
    /// # Returns
    ///
    /// `true` when a session was restored.
    pub async fn load(&self) -> bool {
        let mut guard = self.state.lock().await;
        match self.repository.load().await {
            Ok(Some(session)) => {
                tracing::info!(
                    target: "session",
                    articles = session.articles.len(),
                    "restored persisted session"
                );
                *guard = session;
                true
            }
            Ok(None) => false,
            Err(err) => {
                tracing::error!(target: "session", %err, "failed to load session; starting empty");
                false
            }
        }
    }

    /// Returns a point-in-time copy of the whole session.
    pub async fn snapshot(&self) -> Session {
        self.state.lock().await.clone()
    }

    /// Clears all state to defaults and deletes the persisted file.
    pub async fn reset(&self) {
        let mut guard = self.state.lock().await;
        *guard = Session::default();
        if let Err(err) = self.repository.delete().await {
            tracing::error!(target: "session", %err, "failed to delete persisted session");
        }
    }

    /// Starts a brand-new workflow: clears the session and records the plan.
    pub async fn begin_workflow(&self, plan: WorkflowPlan) {
        let mut guard = self.state.lock().await;
        *guard = Session::default();
        guard.current_workflow = Some(plan);
        self.persist(&mut guard).await;
    }

    /// Applies a partial update to the working draft.
    pub async fn update_draft(&self, update: DraftUpdate) {
        let mut guard = self.state.lock().await;
        let draft = &mut guard.draft;
        if let Some(title) = update.title {
            draft.title = title;
        }
        if let Some(content) = update.content {
            draft.content = content;
        }
        if let Some(keywords) = update.keywords {
            draft.keywords = keywords;
        }
        if let Some(meta_description) = update.meta_description {
            draft.meta_description = meta_description;
        }
        if let Some(meta_title) = update.meta_title {
            draft.meta_title = meta_title;
        }
        if let Some(cover) = update.cover_image_url {
            draft.cover_image_url = Some(cover);
        }
        if let Some(images) = update.inline_images {
            draft.inline_images = images;
        }
        self.persist(&mut guard).await;
    }

    /// Saves a new article from the given fields.
    ///
    /// The new article inherits the draft's cover and inline images, which
    /// are then cleared so the next article starts with none. The remaining
    /// draft fields persist for single-article compatibility callers.
    pub async fn add_article(&self, input: ArticleInput) -> Article {
        let mut guard = self.state.lock().await;

        let article = Article {
            id: Uuid::new_v4().to_string(),
            word_count: word_count(&input.content),
            title: input.title,
            content: input.content,
            keywords: input.keywords,
            meta_description: input.meta_description,
            meta_title: input.meta_title,
            cover_image_url: guard.draft.cover_image_url.clone(),
            inline_images: guard.draft.inline_images.clone(),
            saved_at: Utc::now(),
            published: false,
            published_to: Vec::new(),
            published_at: None,
        };
        guard.articles.push(article.clone());
        guard.draft.clear_images();
        self.persist(&mut guard).await;

        article
    }

    /// Removes articles by 1-based display index.
    ///
    /// Indices are processed in descending order so earlier removals cannot
    /// shift the positions of later ones. Out-of-range indices and published
    /// articles are skipped and reported, never errors.
    pub async fn remove_articles(&self, display_indices: &[usize]) -> RemoveOutcome {
        let mut guard = self.state.lock().await;

        let mut indices: Vec<usize> = display_indices.to_vec();
        indices.sort_unstable_by(|a, b| b.cmp(a));
        indices.dedup();

        let mut outcome = RemoveOutcome::default();
        for index in indices {
            if index == 0 || index > guard.articles.len() {
                outcome.skipped.push(SkippedRemoval {
                    index,
                    reason: "out of range".to_string(),
                });
                continue;
            }
            if guard.articles[index - 1].published {
                outcome.skipped.push(SkippedRemoval {
                    index,
                    reason: "already published".to_string(),
                });
                continue;
            }
            guard.articles.remove(index - 1);
            outcome.removed.push(index);
        }

        if !outcome.removed.is_empty() {
            self.persist(&mut guard).await;
        }
        outcome
    }

    /// Records the last content folder written to disk.
    pub async fn set_content_folder(&self, folder: PathBuf) {
        let mut guard = self.state.lock().await;
        guard.content_folder = Some(folder);
        self.persist(&mut guard).await;
    }

    /// Applies a whole batch of publish outcomes, persisting exactly once.
    ///
    /// An article becomes `published` iff at least one platform succeeded;
    /// `published_at` is stamped only on the unpublished-to-published
    /// transition. Unknown article IDs (the draft pseudo-article sentinel)
    /// are ignored.
    pub async fn apply_publish_updates(&self, updates: Vec<PublishUpdate>) {
        let mut guard = self.state.lock().await;
        let now = Utc::now();
        let mut changed = false;

        for update in updates {
            if update.succeeded_platforms.is_empty() {
                continue;
            }
            let Some(article) = guard.articles.iter_mut().find(|a| a.id == update.article_id)
            else {
                continue;
            };
            if !article.published {
                article.published = true;
                article.published_at = Some(now);
            }
            for platform in update.succeeded_platforms {
                let platform = platform.to_lowercase();
                if !article.published_to.contains(&platform) {
                    article.published_to.push(platform);
                }
            }
            changed = true;
        }

        if changed {
            self.persist(&mut guard).await;
        }
    }

    /// Persists the locked session, refreshing `saved_at`.
    ///
    /// Failures are logged, never raised: the in-memory state stays
    /// authoritative even when the on-disk mirror goes stale.
    async fn persist(&self, session: &mut Session) {
        session.saved_at = Utc::now();
        if let Err(err) = self.repository.save(session).await {
            tracing::error!(target: "session", %err, "failed to persist session; continuing in memory");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuillError;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;

    /// In-memory repository double; can be switched into a failing mode.
    #[derive(Default)]
    struct MemoryRepository {
        stored: StdMutex<Option<Session>>,
        fail_saves: StdMutex<bool>,
    }

    impl MemoryRepository {
        fn stored(&self) -> Option<Session> {
            self.stored.lock().unwrap().clone()
        }

        fn set_failing(&self, failing: bool) {
            *self.fail_saves.lock().unwrap() = failing;
        }
    }

    #[async_trait]
    impl SessionRepository for MemoryRepository {
        async fn load(&self) -> crate::error::Result<Option<Session>> {
            Ok(self.stored())
        }

        async fn save(&self, session: &Session) -> crate::error::Result<()> {
            if *self.fail_saves.lock().unwrap() {
                return Err(QuillError::io("disk full"));
            }
            *self.stored.lock().unwrap() = Some(session.clone());
            Ok(())
        }

        async fn delete(&self) -> crate::error::Result<()> {
            *self.stored.lock().unwrap() = None;
            Ok(())
        }
    }

    fn store() -> (SessionStore, Arc<MemoryRepository>) {
        let repository = Arc::new(MemoryRepository::default());
        (SessionStore::new(repository.clone()), repository)
    }

    fn input(title: &str, content: &str) -> ArticleInput {
        ArticleInput {
            title: title.to_string(),
            content: content.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn save_computes_word_count_by_whitespace_tokens() {
        let (store, _) = store();
        let content = vec!["token"; 100].join(" ");
        let article = store.add_article(input("A", &content)).await;
        assert_eq!(article.word_count, 100);
    }

    #[tokio::test]
    async fn save_inherits_and_clears_draft_images() {
        let (store, _) = store();
        store
            .update_draft(DraftUpdate {
                cover_image_url: Some("https://img.example.com/cover.png".to_string()),
                inline_images: Some(vec!["https://img.example.com/1.png".to_string()]),
                ..Default::default()
            })
            .await;

        let article = store.add_article(input("A", "body text")).await;
        assert_eq!(
            article.cover_image_url.as_deref(),
            Some("https://img.example.com/cover.png")
        );
        assert_eq!(article.inline_images.len(), 1);

        // Next article must start with no inherited images
        let next = store.add_article(input("B", "body text")).await;
        assert!(next.cover_image_url.is_none());
        assert!(next.inline_images.is_empty());

        // Non-image draft fields survive for single-draft callers
        let session = store.snapshot().await;
        assert!(session.draft.cover_image_url.is_none());
    }

    #[tokio::test]
    async fn article_ids_are_unique() {
        let (store, _) = store();
        let a = store.add_article(input("A", "x")).await;
        let b = store.add_article(input("B", "x")).await;
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn remove_skips_published_and_out_of_range_indices() {
        let (store, _) = store();
        for i in 1..=5 {
            store.add_article(input(&format!("A{}", i), "x")).await;
        }
        let fifth = store.snapshot().await.articles[4].id.clone();
        store
            .apply_publish_updates(vec![PublishUpdate {
                article_id: fifth,
                succeeded_platforms: vec!["ghost".to_string()],
            }])
            .await;

        let outcome = store.remove_articles(&[2, 5]).await;
        assert_eq!(outcome.removed, vec![2]);
        assert_eq!(
            outcome.skipped,
            vec![SkippedRemoval {
                index: 5,
                reason: "already published".to_string(),
            }]
        );
        assert_eq!(store.snapshot().await.articles.len(), 4);

        let outcome = store.remove_articles(&[99]).await;
        assert_eq!(outcome.skipped[0].reason, "out of range");
    }

    #[tokio::test]
    async fn multi_removal_processes_descending_without_index_shift() {
        let (store, _) = store();
        for i in 1..=4 {
            store.add_article(input(&format!("A{}", i), "x")).await;
        }
        let outcome = store.remove_articles(&[1, 3]).await;
        assert_eq!(outcome.removed, vec![3, 1]);

        let titles: Vec<_> = store
            .snapshot()
            .await
            .articles
            .iter()
            .map(|a| a.title.clone())
            .collect();
        assert_eq!(titles, vec!["A2".to_string(), "A4".to_string()]);
    }

    #[tokio::test]
    async fn published_at_is_stamped_only_once() {
        let (store, _) = store();
        let article = store.add_article(input("A", "x")).await;

        store
            .apply_publish_updates(vec![PublishUpdate {
                article_id: article.id.clone(),
                succeeded_platforms: vec!["Ghost".to_string()],
            }])
            .await;
        let first = store.snapshot().await.articles[0].published_at;
        assert!(first.is_some());
        assert_eq!(
            store.snapshot().await.articles[0].published_to,
            vec!["ghost".to_string()]
        );

        store
            .apply_publish_updates(vec![PublishUpdate {
                article_id: article.id,
                succeeded_platforms: vec!["wordpress".to_string()],
            }])
            .await;
        let session = store.snapshot().await;
        assert_eq!(session.articles[0].published_at, first);
        assert_eq!(
            session.articles[0].published_to,
            vec!["ghost".to_string(), "wordpress".to_string()]
        );
    }

    #[tokio::test]
    async fn persistence_failure_keeps_in_memory_state_authoritative() {
        let (store, repository) = store();
        repository.set_failing(true);

        store.add_article(input("A", "x")).await;
        assert_eq!(store.snapshot().await.articles.len(), 1);
        assert!(repository.stored().is_none());

        // Recovery: the next successful persist writes the full state
        repository.set_failing(false);
        store.add_article(input("B", "x")).await;
        assert_eq!(repository.stored().unwrap().articles.len(), 2);
    }

    #[tokio::test]
    async fn reset_clears_state_and_deletes_file() {
        let (store, repository) = store();
        store.add_article(input("A", "x")).await;
        assert!(repository.stored().is_some());

        store.reset().await;
        assert!(store.snapshot().await.articles.is_empty());
        assert!(repository.stored().is_none());
    }

    #[tokio::test]
    async fn begin_workflow_replaces_prior_state() {
        let (store, _) = store();
        store.add_article(input("old", "x")).await;

        let plan = crate::workflow::PlanBuilder::build(
            &crate::workflow::PlanRequest {
                request: "r".to_string(),
                article_count: 1,
                requested_targets: vec!["ghost".to_string()],
                want_images: false,
            },
            &crate::config::ProjectConfig {
                name: "p".to_string(),
                url: "https://p.example.com".to_string(),
                niche: Some("n".to_string()),
                target_word_count: Some(800),
                reading_level: None,
                brand_voice: Some("v".to_string()),
                target_audience: None,
                primary_keywords: vec!["k".to_string()],
                geo_focus: None,
                visual_style: None,
                include_images: false,
                external_tools: vec![],
            },
            &crate::workflow::AvailableIntegrations::default(),
        )
        .unwrap()
        .0;

        store.begin_workflow(plan.clone()).await;
        let session = store.snapshot().await;
        assert!(session.articles.is_empty());
        assert_eq!(session.current_workflow.unwrap().id, plan.id);
    }

    #[tokio::test]
    async fn concurrent_saves_all_land() {
        let (store, _) = store();
        let store = Arc::new(store);

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.add_article(input(&format!("A{}", i), "x")).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(store.snapshot().await.articles.len(), 8);
    }
}
