//! Project and secret configuration models.
//!
//! `ProjectConfig` describes the content project being produced (niche, brand
//! voice, word-count targets). It is loaded from `~/.config/quill/config.toml`
//! by the infrastructure layer.
//!
//! `SecretConfig` holds provider credentials as a tagged union keyed by
//! provider name, so an unknown or malformed credential shape is rejected at
//! load time instead of surfacing as a duck-typing failure deep inside a
//! publish call.

use crate::error::{QuillError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the content project being produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project/site name
    pub name: String,
    /// Site URL
    pub url: String,
    /// Content niche (required for plan building)
    #[serde(default)]
    pub niche: Option<String>,
    /// Target word count per article (required, 100..=10_000)
    #[serde(default)]
    pub target_word_count: Option<u32>,
    /// Target reading level (e.g. "8th grade")
    #[serde(default)]
    pub reading_level: Option<String>,
    /// Brand voice description (required for plan building)
    #[serde(default)]
    pub brand_voice: Option<String>,
    /// Target audience description (advisory when missing)
    #[serde(default)]
    pub target_audience: Option<String>,
    /// Primary keywords to build content around (advisory when empty)
    #[serde(default)]
    pub primary_keywords: Vec<String>,
    /// Geographic focus, if any
    #[serde(default)]
    pub geo_focus: Option<String>,
    /// Visual style hint for generated images
    #[serde(default)]
    pub visual_style: Option<String>,
    /// Whether image generation is enabled for this project
    #[serde(default = "default_include_images")]
    pub include_images: bool,
    /// Names of external tools the executing agent may call
    #[serde(default)]
    pub external_tools: Vec<String>,
}

fn default_include_images() -> bool {
    true
}

/// A single provider credential, tagged by provider name.
///
/// The tag makes the on-disk `secret.json` self-describing:
///
/// ```json
/// {
///   "credentials": [
///     { "provider": "ghost", "api_url": "https://blog.example.com", "admin_api_key": "..." },
///     { "provider": "wordpress", "site_url": "...", "username": "...", "app_password": "..." },
///     { "provider": "gemini", "api_key": "..." },
///     { "provider": "backend", "base_url": "...", "api_token": "..." }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum ProviderCredential {
    /// Ghost CMS admin API credential
    Ghost { api_url: String, admin_api_key: String },
    /// WordPress application-password credential
    Wordpress {
        site_url: String,
        username: String,
        app_password: String,
    },
    /// Image generation provider credential
    Gemini { api_key: String },
    /// Content generation backend credential
    Backend { base_url: String, api_token: String },
}

impl ProviderCredential {
    /// The provider name used as the serde tag.
    pub fn provider(&self) -> &'static str {
        match self {
            Self::Ghost { .. } => "ghost",
            Self::Wordpress { .. } => "wordpress",
            Self::Gemini { .. } => "gemini",
            Self::Backend { .. } => "backend",
        }
    }

    /// Whether this credential unlocks a publish target.
    pub fn is_publishing(&self) -> bool {
        matches!(self, Self::Ghost { .. } | Self::Wordpress { .. })
    }

    /// Whether this credential unlocks image generation.
    pub fn is_image_generation(&self) -> bool {
        matches!(self, Self::Gemini { .. })
    }

    /// Checks that no credential field is blank.
    fn validate(&self) -> Result<()> {
        let fields: Vec<(&str, &str)> = match self {
            Self::Ghost {
                api_url,
                admin_api_key,
            } => vec![("api_url", api_url), ("admin_api_key", admin_api_key)],
            Self::Wordpress {
                site_url,
                username,
                app_password,
            } => vec![
                ("site_url", site_url),
                ("username", username),
                ("app_password", app_password),
            ],
            Self::Gemini { api_key } => vec![("api_key", api_key)],
            Self::Backend {
                base_url,
                api_token,
            } => vec![("base_url", base_url), ("api_token", api_token)],
        };

        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(QuillError::validation(format!(
                    "credential '{}' has an empty '{}' field",
                    self.provider(),
                    field
                )));
            }
        }
        Ok(())
    }
}

/// The full credential set loaded from `secret.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub credentials: Vec<ProviderCredential>,
}

impl SecretConfig {
    /// Validates the credential set: no blank fields, no duplicate providers.
    pub fn validate(&self) -> Result<()> {
        let mut seen: Vec<&'static str> = Vec::new();
        for credential in &self.credentials {
            credential.validate()?;
            let provider = credential.provider();
            if seen.contains(&provider) {
                return Err(QuillError::validation(format!(
                    "duplicate credential for provider '{}'",
                    provider
                )));
            }
            seen.push(provider);
        }
        Ok(())
    }

    /// Finds a credential by its provider tag.
    pub fn find(&self, provider: &str) -> Option<&ProviderCredential> {
        self.credentials.iter().find(|c| c.provider() == provider)
    }

    /// Names of publish platforms with an available credential.
    pub fn publishing_platforms(&self) -> Vec<String> {
        self.credentials
            .iter()
            .filter(|c| c.is_publishing())
            .map(|c| c.provider().to_string())
            .collect()
    }

    /// Whether an image generation credential is available.
    pub fn has_image_generation(&self) -> bool {
        self.credentials.iter().any(|c| c.is_image_generation())
    }

    /// Whether a content backend credential is available.
    pub fn has_backend(&self) -> bool {
        self.find("backend").is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ghost() -> ProviderCredential {
        ProviderCredential::Ghost {
            api_url: "https://blog.example.com".to_string(),
            admin_api_key: "abc:def".to_string(),
        }
    }

    #[test]
    fn tagged_union_round_trips_by_provider_name() {
        let json = r#"{
            "credentials": [
                { "provider": "ghost", "api_url": "https://b.example.com", "admin_api_key": "k" },
                { "provider": "gemini", "api_key": "g" }
            ]
        }"#;
        let config: SecretConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.publishing_platforms(), vec!["ghost".to_string()]);
        assert!(config.has_image_generation());
        assert!(!config.has_backend());
        config.validate().unwrap();
    }

    #[test]
    fn unknown_provider_shape_is_rejected_at_parse_time() {
        let json = r#"{ "credentials": [ { "provider": "mystery", "token": "x" } ] }"#;
        assert!(serde_json::from_str::<SecretConfig>(json).is_err());
    }

    #[test]
    fn duplicate_provider_fails_validation() {
        let config = SecretConfig {
            credentials: vec![ghost(), ghost()],
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn blank_field_fails_validation() {
        let config = SecretConfig {
            credentials: vec![ProviderCredential::Gemini {
                api_key: "  ".to_string(),
            }],
        };
        assert!(config.validate().is_err());
    }
}
