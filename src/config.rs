use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::debrid::client::DEFAULT_BASE_URL;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Seconds between remote status checks while waiting for a job.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Maximum seconds to wait for a job to become ready.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Root folder downloads land in, unless overridden per invocation.
    #[serde(default = "default_output_directory")]
    pub output_directory: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

// Default value functions
fn default_poll_interval_secs() -> u64 {
    5
}
fn default_timeout_secs() -> u64 {
    1800
}
fn default_output_directory() -> String {
    "downloads".to_string()
}
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            timeout_secs: default_timeout_secs(),
            output_directory: default_output_directory(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

pub struct ConfigManager {
    config_dir: PathBuf,
    config_file: PathBuf,
    config: Config,
}

impl ConfigManager {
    /// Create a new ConfigManager and load existing config or create default
    pub fn new() -> Result<Self> {
        let project_dirs = ProjectDirs::from("", "", "debrid-dl")
            .context("Failed to determine config directory")?;
        Self::at(project_dirs.config_dir())
    }

    /// Same as [`ConfigManager::new`] but rooted at an explicit directory.
    pub fn at(config_dir: &Path) -> Result<Self> {
        let config_dir = config_dir.to_path_buf();
        let config_file = config_dir.join("config.toml");

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
        }

        let config = if config_file.exists() {
            Self::load_config(&config_file)?
        } else {
            let default_config = Config::default();
            Self::save_config(&config_file, &default_config)?;
            default_config
        };

        Ok(Self {
            config_dir,
            config_file,
            config,
        })
    }

    /// Get a reference to the current config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Save the current config to disk
    pub fn save(&self) -> Result<()> {
        Self::save_config(&self.config_file, &self.config)
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Get the config file path
    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Load config from file
    fn load_config(config_file: &Path) -> Result<Config> {
        let content = fs::read_to_string(config_file)
            .with_context(|| format!("Failed to read config file: {:?}", config_file))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_file))?;

        Ok(config)
    }

    /// Save config to file
    fn save_config(config_file: &Path, config: &Config) -> Result<()> {
        let content = toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(config_file, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_file))?;

        Ok(())
    }

    /// Validate the current configuration
    pub fn validate(&self) -> Result<()> {
        if self.config.general.poll_interval_secs == 0 {
            anyhow::bail!("poll_interval_secs must be greater than 0");
        }

        if self.config.general.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be greater than 0");
        }

        if self.config.general.output_directory.is_empty() {
            anyhow::bail!("output_directory cannot be empty");
        }

        if self.config.remote.base_url.is_empty() {
            anyhow::bail!("base_url cannot be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn first_run_materializes_defaults_on_disk() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::at(dir.path()).unwrap();

        assert!(manager.config_file().exists());
        assert_eq!(manager.config().general.poll_interval_secs, 5);
        assert_eq!(manager.config().general.timeout_secs, 1800);
        assert_eq!(manager.config().general.output_directory, "downloads");
        assert_eq!(manager.config().remote.base_url, DEFAULT_BASE_URL);

        // A second manager reads the file written by the first.
        let reloaded = ConfigManager::at(dir.path()).unwrap();
        assert_eq!(reloaded.config().general.timeout_secs, 1800);
    }

    #[test]
    fn partial_files_keep_defaults_for_missing_fields() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            "[general]\npoll_interval_secs = 2\n",
        )
        .unwrap();

        let manager = ConfigManager::at(dir.path()).unwrap();
        assert_eq!(manager.config().general.poll_interval_secs, 2);
        assert_eq!(manager.config().general.timeout_secs, 1800);
        assert_eq!(manager.config().remote.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn zero_intervals_fail_validation() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            "[general]\npoll_interval_secs = 0\n",
        )
        .unwrap();

        let manager = ConfigManager::at(dir.path()).unwrap();
        assert!(manager.validate().is_err());
    }
}
