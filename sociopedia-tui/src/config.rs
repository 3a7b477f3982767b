use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sociopedia_types::ColorScheme;
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::DEFAULT_SERVER_URL;

/// User preferences stored locally
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub color_scheme: ColorScheme,
}

/// Server configuration stored locally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub server_url: String,
    pub last_updated: chrono::DateTime<chrono::Utc>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            last_updated: chrono::Utc::now(),
        }
    }
}

/// Configuration manager for the .sociopedia directory
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a config manager rooted at `~/.sociopedia`
    pub fn new() -> Result<Self> {
        Self::with_dir(Self::default_config_dir()?)
    }

    /// Create a config manager rooted at an explicit directory
    pub fn with_dir(config_dir: impl Into<PathBuf>) -> Result<Self> {
        let config_dir = config_dir.into();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .context("Failed to create .sociopedia directory")?;
        }

        Ok(Self { config_dir })
    }

    fn default_config_dir() -> Result<PathBuf> {
        let home_dir = dirs::home_dir()
            .context("Could not determine home directory")?;
        Ok(home_dir.join(".sociopedia"))
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// File backing the persistent key-value store (follow status cache)
    pub fn local_storage_file(&self) -> PathBuf {
        self.config_dir.join("local_storage.json")
    }

    /// File holding the session cookie and the logged-in user
    pub fn session_file(&self) -> PathBuf {
        self.config_dir.join("session.json")
    }

    fn preferences_file(&self) -> PathBuf {
        self.config_dir.join("preferences.json")
    }

    fn server_config_file(&self) -> PathBuf {
        self.config_dir.join("server_config.json")
    }

    /// Save user preferences
    pub fn save_preferences(&self, prefs: &UserPreferences) -> Result<()> {
        let json = serde_json::to_string_pretty(prefs)
            .context("Failed to serialize preferences")?;

        fs::write(self.preferences_file(), json)
            .context("Failed to write preferences file")?;

        Ok(())
    }

    /// Load user preferences
    pub fn load_preferences(&self) -> Result<Option<UserPreferences>> {
        let prefs_file = self.preferences_file();

        if !prefs_file.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&prefs_file)
            .context("Failed to read preferences file")?;

        let prefs: UserPreferences = serde_json::from_str(&json)
            .context("Failed to parse preferences")?;

        Ok(Some(prefs))
    }

    /// Save server configuration
    pub fn save_server_config(&self, config: &ServerConfig) -> Result<()> {
        let json = serde_json::to_string_pretty(config)
            .context("Failed to serialize server config")?;

        fs::write(self.server_config_file(), json)
            .context("Failed to write server config file")?;

        Ok(())
    }

    /// Load server configuration
    pub fn load_server_config(&self) -> Result<Option<ServerConfig>> {
        let config_file = self.server_config_file();

        if !config_file.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&config_file)
            .context("Failed to read server config file")?;

        let config: ServerConfig = serde_json::from_str(&json)
            .context("Failed to parse server config")?;

        Ok(Some(config))
    }
}
