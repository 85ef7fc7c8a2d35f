//! Batch Publish Coordinator.
//!
//! Selects saved articles, dispatches each one to every requested publish
//! target, and aggregates partial success. Articles are processed
//! sequentially so progress reporting stays deterministic; a platform
//! failure is captured per target and never aborts the remaining platforms
//! or articles. The session is persisted exactly once, after the whole
//! batch.

use quill_core::error::Result;
use quill_core::integration::Publisher;
use quill_core::publish::{ArticleReport, BatchReport, PublishOptions, TargetOutcome};
use quill_core::session::{Article, PublishUpdate, SessionStore, word_count};
use regex::Regex;
use std::sync::{Arc, LazyLock};

static IMAGE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[IMAGE(?:_\d+)?\]").expect("image marker pattern"));

/// Sentinel ID for the legacy single-draft compatibility path. Never written
/// back into the article sequence.
pub const DRAFT_SENTINEL_ID: &str = "draft";

/// Coordinates one batch publish invocation.
pub struct PublishUseCase {
    store: Arc<SessionStore>,
    publishers: Vec<Arc<dyn Publisher>>,
}

impl PublishUseCase {
    pub fn new(store: Arc<SessionStore>, publishers: Vec<Arc<dyn Publisher>>) -> Self {
        Self { store, publishers }
    }

    /// Publishes the selected articles to the requested platforms.
    ///
    /// Selection order:
    /// 1. explicit 1-based indices, dropping already-published articles;
    /// 2. every unpublished saved article;
    /// 3. the working draft as a pseudo-article (title and content both set);
    /// 4. otherwise an informative no-op report.
    pub async fn publish(
        &self,
        platforms: &[String],
        options: &PublishOptions,
        explicit_indices: &[usize],
    ) -> Result<BatchReport> {
        if platforms.is_empty() {
            return Ok(BatchReport::no_op("no publish platforms requested"));
        }

        let session = self.store.snapshot().await;
        let selected = match select_articles(&session, explicit_indices) {
            Ok(selected) => selected,
            Err(notice) => return Ok(BatchReport::no_op(notice)),
        };

        let total = selected.len();
        let mut reports = Vec::with_capacity(total);
        let mut updates = Vec::new();

        for (position, mut article) in selected.into_iter().enumerate() {
            tracing::info!(
                target: "publish",
                article = %article.title,
                position = position + 1,
                total,
                "publishing article"
            );
            article.content = inject_inline_images(&article.content, &article.inline_images);

            let mut outcomes = Vec::with_capacity(platforms.len());
            let mut succeeded = Vec::new();
            for platform in platforms {
                let outcome = self.publish_to(platform, &article, options).await;
                if outcome.success {
                    succeeded.push(platform.to_lowercase());
                }
                outcomes.push(outcome);
            }

            if article.id != DRAFT_SENTINEL_ID && !succeeded.is_empty() {
                updates.push(PublishUpdate {
                    article_id: article.id.clone(),
                    succeeded_platforms: succeeded,
                });
            }

            reports.push(ArticleReport {
                article_id: article.id,
                title: article.title,
                word_count: article.word_count,
                outcomes,
            });
        }

        // One persist for the whole batch
        self.store.apply_publish_updates(updates).await;

        Ok(BatchReport::from_articles(reports))
    }

    /// Delivers one article to one platform, capturing failure as data.
    async fn publish_to(
        &self,
        platform: &str,
        article: &Article,
        options: &PublishOptions,
    ) -> TargetOutcome {
        let Some(publisher) = self
            .publishers
            .iter()
            .find(|p| p.platform().eq_ignore_ascii_case(platform))
        else {
            return TargetOutcome {
                platform: platform.to_string(),
                success: false,
                detail: format!("no publisher configured for '{}'", platform),
            };
        };

        match publisher.publish(article, options).await {
            Ok(url) => TargetOutcome {
                platform: platform.to_string(),
                success: true,
                detail: url,
            },
            Err(err) => {
                tracing::warn!(
                    target: "publish",
                    platform,
                    article = %article.title,
                    %err,
                    "platform publish failed"
                );
                TargetOutcome {
                    platform: platform.to_string(),
                    success: false,
                    detail: err.to_string(),
                }
            }
        }
    }
}

/// Applies the selection policy. `Err` carries the no-op notice.
fn select_articles(
    session: &quill_core::session::Session,
    explicit_indices: &[usize],
) -> std::result::Result<Vec<Article>, String> {
    if !explicit_indices.is_empty() {
        let mut selected: Vec<Article> = Vec::new();
        for &index in explicit_indices {
            let Some(article) = session.article_at(index) else {
                continue;
            };
            if article.published {
                continue;
            }
            if !selected.iter().any(|a| a.id == article.id) {
                selected.push(article.clone());
            }
        }
        if selected.is_empty() {
            return Err(
                "requested articles are already published or out of range".to_string(),
            );
        }
        return Ok(selected);
    }

    let unpublished: Vec<Article> = session
        .articles
        .iter()
        .filter(|a| !a.published)
        .cloned()
        .collect();
    if !unpublished.is_empty() {
        return Ok(unpublished);
    }

    if session.draft.is_publishable() {
        let draft = &session.draft;
        return Ok(vec![Article {
            id: DRAFT_SENTINEL_ID.to_string(),
            title: draft.title.clone(),
            content: draft.content.clone(),
            keywords: draft.keywords.clone(),
            meta_description: draft.meta_description.clone(),
            meta_title: draft.meta_title.clone(),
            cover_image_url: draft.cover_image_url.clone(),
            inline_images: draft.inline_images.clone(),
            word_count: word_count(&draft.content),
            saved_at: session.saved_at,
            published: false,
            published_to: Vec::new(),
            published_at: None,
        }]);
    }

    Err("nothing is eligible for publishing".to_string())
}

/// Substitutes `[IMAGE_N]` placeholder markers with the article's inline
/// images, one-to-one in document order. Surplus markers are left verbatim;
/// images are never reordered, skipped, or reused.
pub fn inject_inline_images(content: &str, images: &[String]) -> String {
    if images.is_empty() {
        return content.to_string();
    }

    let mut next = 0usize;
    IMAGE_MARKER
        .replace_all(content, |caps: &regex::Captures| {
            if next < images.len() {
                let url = &images[next];
                next += 1;
                format!("![]({})", url)
            } else {
                caps[0].to_string()
            }
        })
        .to_string()
}
