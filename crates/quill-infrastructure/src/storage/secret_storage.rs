//! Secret configuration file storage.
//!
//! Loads provider credentials from `~/.config/quill/secret.json` and
//! validates the tagged-union credential shapes at load time, so a malformed
//! credential fails here instead of deep inside a publish call.

use crate::paths::QuillPaths;
use quill_core::config::SecretConfig;
use std::fs;
use std::path::PathBuf;

/// Errors that can occur during secret storage operations.
#[derive(Debug)]
pub enum SecretStorageError {
    /// Credentials file not found.
    NotFound(PathBuf),
    /// File I/O error.
    IoError(std::io::Error),
    /// JSON parsing error.
    ParseError(serde_json::Error),
    /// Credential content failed validation.
    InvalidCredential(String),
    /// Config directory not found.
    ConfigDirNotFound,
}

impl std::fmt::Display for SecretStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretStorageError::NotFound(path) => {
                write!(f, "Credentials file not found at: {}", path.display())
            }
            SecretStorageError::IoError(e) => write!(f, "I/O error: {}", e),
            SecretStorageError::ParseError(e) => write!(f, "JSON parse error: {}", e),
            SecretStorageError::InvalidCredential(e) => write!(f, "Invalid credential: {}", e),
            SecretStorageError::ConfigDirNotFound => {
                write!(f, "Could not determine home directory")
            }
        }
    }
}

impl std::error::Error for SecretStorageError {}

impl From<std::io::Error> for SecretStorageError {
    fn from(e: std::io::Error) -> Self {
        SecretStorageError::IoError(e)
    }
}

impl From<serde_json::Error> for SecretStorageError {
    fn from(e: serde_json::Error) -> Self {
        SecretStorageError::ParseError(e)
    }
}

/// Storage for the credentials file (secret.json).
///
/// Responsibilities:
/// - Load secret.json from ~/.config/quill/
/// - Parse JSON into the tagged-union `SecretConfig`
/// - Validate credential shapes at load time
///
/// Does NOT:
/// - Write or modify secret files (read-only)
/// - Verify credentials against the remote services
/// - Handle encryption (plaintext JSON storage)
///
/// # Security Note
///
/// This storage reads plaintext JSON files. The secret.json file should have
/// restrictive file permissions (e.g. 600).
pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    /// Creates a new SecretStorage with the default path
    /// (~/.config/quill/secret.json).
    pub fn new() -> Result<Self, SecretStorageError> {
        let path = QuillPaths::secret_file().map_err(|_| SecretStorageError::ConfigDirNotFound)?;
        Ok(Self { path })
    }

    /// Creates a new SecretStorage with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads and validates the credential set.
    ///
    /// # Returns
    ///
    /// - `Ok(SecretConfig)`: successfully loaded, parsed, and validated
    /// - `Err(SecretStorageError::NotFound)`: file doesn't exist
    /// - `Err(SecretStorageError::ParseError)`: unknown provider tag or shape
    /// - `Err(SecretStorageError::InvalidCredential)`: blank or duplicate entry
    pub fn load(&self) -> Result<SecretConfig, SecretStorageError> {
        if !self.path.exists() {
            return Err(SecretStorageError::NotFound(self.path.clone()));
        }

        let content = fs::read_to_string(&self.path)?;
        let config: SecretConfig = serde_json::from_str(&content)?;
        config
            .validate()
            .map_err(|e| SecretStorageError::InvalidCredential(e.to_string()))?;
        Ok(config)
    }

    /// Loads credentials, treating a missing file as an empty credential set.
    pub fn load_or_default(&self) -> Result<SecretConfig, SecretStorageError> {
        match self.load() {
            Ok(config) => Ok(config),
            Err(SecretStorageError::NotFound(_)) => Ok(SecretConfig::default()),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn loads_and_validates_credentials() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        fs::write(
            &path,
            r#"{
                "credentials": [
                    { "provider": "ghost", "api_url": "https://b.example.com", "admin_api_key": "k" },
                    { "provider": "backend", "base_url": "https://api.example.com", "api_token": "t" }
                ]
            }"#,
        )
        .unwrap();

        let config = SecretStorage::with_path(path).load().unwrap();
        assert_eq!(config.publishing_platforms(), vec!["ghost".to_string()]);
        assert!(config.has_backend());
    }

    #[test]
    fn missing_file_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let storage = SecretStorage::with_path(temp_dir.path().join("secret.json"));
        assert!(matches!(
            storage.load(),
            Err(SecretStorageError::NotFound(_))
        ));
        assert_eq!(
            storage.load_or_default().unwrap(),
            SecretConfig::default()
        );
    }

    #[test]
    fn invalid_credential_is_rejected_at_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        fs::write(
            &path,
            r#"{ "credentials": [ { "provider": "gemini", "api_key": "" } ] }"#,
        )
        .unwrap();

        assert!(matches!(
            SecretStorage::with_path(path).load(),
            Err(SecretStorageError::InvalidCredential(_))
        ));
    }
}
