use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

const KEY_FILE: &str = "api_key.txt";

/// File-backed store for the debrid API key.
///
/// The key is an opaque bearer token; it is stored and passed along verbatim,
/// never parsed.
pub struct KeyStore {
    file: PathBuf,
}

impl KeyStore {
    pub fn new() -> Result<Self> {
        let project_dirs = ProjectDirs::from("", "", "debrid-dl")
            .context("Failed to determine config directory")?;
        Ok(Self::at(project_dirs.config_dir()))
    }

    /// Store rooted at an explicit directory.
    pub fn at(dir: &Path) -> Self {
        Self {
            file: dir.join(KEY_FILE),
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// The stored key, or None when the file is missing or blank.
    pub fn load(&self) -> Option<String> {
        let value = fs::read_to_string(&self.file).ok()?;
        let value = value.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }

    pub fn save(&self, api_key: &str) -> Result<()> {
        if let Some(parent) = self.file.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&self.file, api_key)
            .with_context(|| format!("Failed to write {}", self.file.display()))?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.file.exists() {
            fs::remove_file(&self.file)
                .with_context(|| format!("Failed to remove {}", self.file.display()))?;
        }
        Ok(())
    }
}
