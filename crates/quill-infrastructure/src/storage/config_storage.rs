//! Project configuration file storage.
//!
//! Loads the `ProjectConfig` from `~/.config/quill/config.toml`. Absence of
//! required fields is not checked here: the plan builder performs itemized
//! validation at build time, so a partially filled config still loads.

use crate::paths::QuillPaths;
use quill_core::config::ProjectConfig;
use quill_core::error::{QuillError, Result};
use std::fs;
use std::path::PathBuf;

/// Storage for the project configuration file (config.toml).
pub struct ProjectConfigStorage {
    path: PathBuf,
}

impl ProjectConfigStorage {
    /// Creates storage with the default path (~/.config/quill/config.toml).
    pub fn new() -> Result<Self> {
        let path = QuillPaths::config_file()
            .map_err(|e| QuillError::io(e.to_string()))?;
        Ok(Self { path })
    }

    /// Creates storage with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the project configuration.
    ///
    /// # Errors
    ///
    /// Returns [`QuillError::NotFound`] when the file is missing and a
    /// serialization error when it cannot be parsed.
    pub fn load(&self) -> Result<ProjectConfig> {
        if !self.path.exists() {
            return Err(QuillError::not_found(
                "project config",
                self.path.display().to_string(),
            ));
        }
        let content = fs::read_to_string(&self.path)?;
        let config: ProjectConfig = toml::from_str(&content)?;
        Ok(config)
    }
}
