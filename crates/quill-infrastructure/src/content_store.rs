//! Per-article on-disk content mirror.
//!
//! Each saved article gets a folder named `{YYYY-MM-DD}-{slug}` holding the
//! raw markdown (`article.md`), its metadata (`metadata.json`), and, when a
//! workflow is active, a `workflow.json` snapshot of the plan for
//! resumability.

use chrono::{DateTime, Utc};
use quill_core::error::{QuillError, Result};
use quill_core::session::Article;
use quill_core::workflow::WorkflowPlan;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const ARTICLE_FILE: &str = "article.md";
const METADATA_FILE: &str = "metadata.json";
const WORKFLOW_FILE: &str = "workflow.json";

/// Article metadata mirrored next to the markdown body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleMetadata {
    pub title: String,
    pub keywords: Vec<String>,
    pub meta_description: String,
    pub meta_title: String,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub inline_images: Vec<String>,
    pub word_count: usize,
    pub created_at: DateTime<Utc>,
    /// Name of the project this article belongs to
    pub project: String,
}

/// One entry of a content listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedContentEntry {
    /// Folder name (`{date}-{slug}`)
    pub folder: String,
    pub title: String,
    pub word_count: usize,
    pub created_at: DateTime<Utc>,
}

/// A fully loaded saved article.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedContent {
    pub folder: String,
    pub content: String,
    pub metadata: ArticleMetadata,
    pub workflow: Option<WorkflowPlan>,
}

/// Writes and reads the per-article folder mirror.
pub struct ContentStore {
    root: PathBuf,
}

impl ContentStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The content root directory.
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Mirrors an article to disk and returns the folder it was written to.
    ///
    /// The folder name is `{YYYY-MM-DD}-{slug}`; when a sibling folder with
    /// the same name already exists a numeric suffix is appended.
    pub fn save_article(
        &self,
        article: &Article,
        project: &str,
        workflow: Option<&WorkflowPlan>,
    ) -> Result<PathBuf> {
        let date = article.saved_at.format("%Y-%m-%d");
        let base_name = format!("{}-{}", date, slugify(&article.title));
        let folder = self.unique_folder(&base_name)?;
        fs::create_dir_all(&folder)?;

        fs::write(folder.join(ARTICLE_FILE), &article.content)?;

        let metadata = ArticleMetadata {
            title: article.title.clone(),
            keywords: article.keywords.clone(),
            meta_description: article.meta_description.clone(),
            meta_title: article.meta_title.clone(),
            cover_image_url: article.cover_image_url.clone(),
            inline_images: article.inline_images.clone(),
            word_count: article.word_count,
            created_at: article.saved_at,
            project: project.to_string(),
        };
        fs::write(
            folder.join(METADATA_FILE),
            serde_json::to_string_pretty(&metadata)?,
        )?;

        if let Some(plan) = workflow {
            fs::write(
                folder.join(WORKFLOW_FILE),
                serde_json::to_string_pretty(plan)?,
            )?;
        }

        Ok(folder)
    }

    /// Lists all mirrored articles, most recent first.
    ///
    /// Folders without a readable `metadata.json` are skipped.
    pub fn list(&self) -> Result<Vec<SavedContentEntry>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }

            let metadata_path = path.join(METADATA_FILE);
            let Ok(raw) = fs::read_to_string(&metadata_path) else {
                continue;
            };
            let Ok(metadata) = serde_json::from_str::<ArticleMetadata>(&raw) else {
                tracing::warn!(
                    target: "content",
                    path = %metadata_path.display(),
                    "skipping folder with unreadable metadata"
                );
                continue;
            };

            entries.push(SavedContentEntry {
                folder: entry.file_name().to_string_lossy().to_string(),
                title: metadata.title,
                word_count: metadata.word_count,
                created_at: metadata.created_at,
            });
        }

        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    /// Loads one mirrored article by folder name.
    pub fn load(&self, folder: &str) -> Result<SavedContent> {
        let path = self.root.join(folder);
        if !path.is_dir() {
            return Err(QuillError::not_found("saved content", folder));
        }

        let content = fs::read_to_string(path.join(ARTICLE_FILE))?;
        let metadata: ArticleMetadata =
            serde_json::from_str(&fs::read_to_string(path.join(METADATA_FILE))?)?;

        let workflow_path = path.join(WORKFLOW_FILE);
        let workflow = if workflow_path.exists() {
            Some(serde_json::from_str(&fs::read_to_string(workflow_path)?)?)
        } else {
            None
        };

        Ok(SavedContent {
            folder: folder.to_string(),
            content,
            metadata,
            workflow,
        })
    }

    /// Finds a folder name not already taken under the content root.
    fn unique_folder(&self, base_name: &str) -> Result<PathBuf> {
        let candidate = self.root.join(base_name);
        if !candidate.exists() {
            return Ok(candidate);
        }
        for suffix in 2..1000 {
            let candidate = self.root.join(format!("{}-{}", base_name, suffix));
            if !candidate.exists() {
                return Ok(candidate);
            }
        }
        Err(QuillError::io(format!(
            "could not find a free folder name for '{}'",
            base_name
        )))
    }
}

/// Lowercases and replaces non-alphanumeric runs with single hyphens.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = true; // suppress a leading hyphen
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn article(title: &str) -> Article {
        Article {
            id: "a1".to_string(),
            title: title.to_string(),
            content: "# Heading\n\nBody text here.".to_string(),
            keywords: vec!["kw".to_string()],
            meta_description: "desc".to_string(),
            meta_title: "meta".to_string(),
            cover_image_url: None,
            inline_images: vec![],
            word_count: 4,
            saved_at: Utc::now(),
            published: false,
            published_to: vec![],
            published_at: None,
        }
    }

    #[test]
    fn slugify_normalizes_titles() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  A  B  "), "a-b");
        assert_eq!(slugify("___"), "untitled");
    }

    #[test]
    fn save_list_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::new(dir.path().to_path_buf());

        let folder = store
            .save_article(&article("My First Post"), "Example", None)
            .unwrap();
        let folder_name = folder.file_name().unwrap().to_string_lossy().to_string();
        assert!(folder_name.ends_with("-my-first-post"));

        let entries = store.list().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "My First Post");

        let loaded = store.load(&folder_name).unwrap();
        assert_eq!(loaded.metadata.project, "Example");
        assert!(loaded.content.contains("Body text"));
        assert!(loaded.workflow.is_none());
    }

    #[test]
    fn duplicate_titles_get_suffixed_folders() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::new(dir.path().to_path_buf());

        let first = store.save_article(&article("Same"), "p", None).unwrap();
        let second = store.save_article(&article("Same"), "p", None).unwrap();
        assert_ne!(first, second);
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn load_missing_folder_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::new(dir.path().to_path_buf());
        assert!(store.load("2024-01-01-nope").unwrap_err().is_not_found());
    }

    #[test]
    fn list_on_missing_root_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::new(dir.path().join("never-created"));
        assert!(store.list().unwrap().is_empty());
    }
}
