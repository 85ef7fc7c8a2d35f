//! Unified path management for quill configuration and data files.
//!
//! All quill configuration, secrets, and session data live under a single
//! configuration directory so every storage component resolves files the
//! same way.

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for quill.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/quill/             # Config directory
/// ├── config.toml              # Project configuration
/// ├── secret.json              # Provider credentials
/// ├── session.json             # Persisted session state
/// └── content/                 # Per-article on-disk mirror
///     └── {YYYY-MM-DD}-{slug}/
///         ├── article.md
///         ├── metadata.json
///         └── workflow.json
/// ```
pub struct QuillPaths;

impl QuillPaths {
    /// Returns the quill configuration directory (`~/.config/quill`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        let home = dirs::home_dir().ok_or(PathError::HomeDirNotFound)?;
        Ok(home.join(".config").join("quill"))
    }

    /// Returns the project configuration file path.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the secret (credentials) file path.
    pub fn secret_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("secret.json"))
    }

    /// Returns the persisted session file path.
    pub fn session_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("session.json"))
    }

    /// Returns the content mirror root directory.
    pub fn content_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("content"))
    }
}
