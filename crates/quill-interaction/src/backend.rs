//! RestToolExecutor - REST implementation of the content backend contract.
//!
//! Executes named tools against the external content-generation backend over
//! authenticated HTTPS. Configuration priority:
//! ~/.config/quill/secret.json > explicit constructor arguments.

use crate::http::{DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT, ResilientClient};
use async_trait::async_trait;
use quill_core::config::{ProviderCredential, SecretConfig};
use quill_core::error::{QuillError, Result};
use quill_core::integration::BackendToolExecutor;
use quill_infrastructure::SecretStorage;
use std::time::Duration;

/// Tool execution over the backend's REST surface.
#[derive(Clone)]
pub struct RestToolExecutor {
    client: ResilientClient,
    base_url: String,
    api_token: String,
    max_retries: u32,
    timeout: Duration,
}

impl RestToolExecutor {
    /// Creates an executor with the provided endpoint and token.
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            client: ResilientClient::new(),
            base_url: base_url.into(),
            api_token: api_token.into(),
            max_retries: DEFAULT_MAX_RETRIES,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Builds an executor from the loaded credential set.
    ///
    /// # Errors
    ///
    /// Returns a validation error when no backend credential is configured.
    pub fn try_from_secrets(secrets: &SecretConfig) -> Result<Self> {
        match secrets.find("backend") {
            Some(ProviderCredential::Backend {
                base_url,
                api_token,
            }) => Ok(Self::new(base_url.clone(), api_token.clone())),
            _ => Err(QuillError::validation(
                "no backend credential in secret.json",
            )),
        }
    }

    /// Builds an executor from ~/.config/quill/secret.json.
    pub fn try_default() -> Result<Self> {
        let secrets = SecretStorage::new()
            .map_err(|e| QuillError::io(e.to_string()))?
            .load_or_default()
            .map_err(|e| QuillError::validation(e.to_string()))?;
        Self::try_from_secrets(&secrets)
    }

    /// Overrides the per-request deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the retry budget.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn tool_url(&self, name: &str) -> String {
        format!("{}/tools/{}", self.base_url.trim_end_matches('/'), name)
    }
}

#[async_trait]
impl BackendToolExecutor for RestToolExecutor {
    async fn execute(&self, name: &str, args: serde_json::Value) -> Result<serde_json::Value> {
        let request = self
            .client
            .client()
            .post(self.tool_url(name))
            .bearer_auth(&self.api_token)
            .json(&serde_json::json!({ "name": name, "arguments": args }));

        let response = self
            .client
            .fetch_with_retry(request, self.max_retries, self.timeout)
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QuillError::execution(format!(
                "backend tool '{}' failed with {}: {}",
                name,
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| QuillError::execution(format!("invalid backend response: {}", e)))
    }
}
