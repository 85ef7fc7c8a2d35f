//! External capability traits.
//!
//! The core depends only on these signatures. Concrete CMS publishers, image
//! providers, and the content-generation backend live behind them; every
//! implementation is expected to route its outbound calls through the
//! resilient HTTP client.

use crate::error::Result;
use crate::publish::PublishOptions;
use crate::session::Article;
use async_trait::async_trait;

/// Delivers one article to one CMS target.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// The platform name this publisher serves (matched case-insensitively
    /// against publish targets).
    fn platform(&self) -> &str;

    /// Publishes the article.
    ///
    /// # Returns
    ///
    /// The published URL on success.
    async fn publish(&self, article: &Article, options: &PublishOptions) -> Result<String>;
}

/// Produces one image from a prompt.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generates an image and returns its URL.
    async fn generate(&self, prompt: &str, style: &str, aspect_ratio: &str) -> Result<String>;
}

/// Authenticated call surface of the external content-generation backend.
///
/// Opaque to this core beyond success/failure of the call.
#[async_trait]
pub trait BackendToolExecutor: Send + Sync {
    async fn execute(&self, name: &str, args: serde_json::Value) -> Result<serde_json::Value>;

    /// Lists the tool names the backend currently exposes.
    ///
    /// Used to populate the plan's available-integration flags; a default
    /// implementation calls the `list_tools` tool.
    async fn list_tools(&self) -> Result<Vec<String>> {
        let value = self.execute("list_tools", serde_json::json!({})).await?;
        let names = value
            .get("tools")
            .and_then(|t| t.as_array())
            .map(|tools| {
                tools
                    .iter()
                    .filter_map(|t| t.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        Ok(names)
    }
}
