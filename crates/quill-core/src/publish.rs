//! Publish report types.
//!
//! These are the pure data results of a batch publish: per-platform outcomes
//! per article plus batch-level totals. Rendering them for a reader is the
//! presentation layer's concern.

use serde::{Deserialize, Serialize};

/// Caller-supplied options forwarded to every publisher in the batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublishOptions {
    /// Target status on the CMS, e.g. "draft" or "published"
    pub status: Option<String>,
    /// Category/tag to file the article under
    pub category: Option<String>,
}

/// Outcome of delivering one article to one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetOutcome {
    pub platform: String,
    pub success: bool,
    /// Published URL on success, error message on failure
    pub detail: String,
}

/// Per-article section of a [`BatchReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleReport {
    pub article_id: String,
    pub title: String,
    pub word_count: usize,
    pub outcomes: Vec<TargetOutcome>,
}

impl ArticleReport {
    /// Whether at least one platform accepted the article.
    pub fn any_success(&self) -> bool {
        self.outcomes.iter().any(|o| o.success)
    }
}

/// Aggregated result of one batch publish invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub articles: Vec<ArticleReport>,
    /// Articles the batch attempted to deliver
    pub attempted: usize,
    /// Articles with at least one successful platform
    pub succeeded: usize,
    /// Sum of word counts over attempted articles
    pub total_words: usize,
    /// Set when the batch was an informative no-op
    pub notice: Option<String>,
}

impl BatchReport {
    /// An informative empty report (nothing eligible, bad indices, ...).
    pub fn no_op(notice: impl Into<String>) -> Self {
        Self {
            notice: Some(notice.into()),
            ..Self::default()
        }
    }

    /// Builds totals from per-article reports.
    pub fn from_articles(articles: Vec<ArticleReport>) -> Self {
        let attempted = articles.len();
        let succeeded = articles.iter().filter(|a| a.any_success()).count();
        let total_words = articles.iter().map(|a| a.word_count).sum();
        Self {
            articles,
            attempted,
            succeeded,
            total_words,
            notice: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_reflect_partial_success() {
        let report = BatchReport::from_articles(vec![
            ArticleReport {
                article_id: "a".to_string(),
                title: "A".to_string(),
                word_count: 500,
                outcomes: vec![
                    TargetOutcome {
                        platform: "ghost".to_string(),
                        success: true,
                        detail: "https://blog.example.com/a".to_string(),
                    },
                    TargetOutcome {
                        platform: "wordpress".to_string(),
                        success: false,
                        detail: "401 unauthorized".to_string(),
                    },
                ],
            },
            ArticleReport {
                article_id: "b".to_string(),
                title: "B".to_string(),
                word_count: 700,
                outcomes: vec![TargetOutcome {
                    platform: "ghost".to_string(),
                    success: false,
                    detail: "timeout".to_string(),
                }],
            },
        ]);

        assert_eq!(report.attempted, 2);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.total_words, 1200);
        assert!(report.notice.is_none());
    }
}
