use crate::api::DEFAULT_SERVER_URL;
use crate::config::{ConfigManager, ServerConfig};
use anyhow::Result;

pub const SERVER_URL_ENV: &str = "SOCIOPEDIA_SERVER_URL";

/// Where the server URL in effect came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerUrlSource {
    Cli,
    Environment,
    SavedConfig,
    Default,
}

/// Resolves and remembers the backend URL
pub struct ServerConfigManager {
    config_manager: ConfigManager,
}

impl ServerConfigManager {
    pub fn new(config_manager: ConfigManager) -> Self {
        Self { config_manager }
    }

    /// Pick the server URL by priority:
    /// 1. CLI argument
    /// 2. `SOCIOPEDIA_SERVER_URL`
    /// 3. Saved configuration file
    /// 4. The hosted default
    ///
    /// Only a URL given on the command line is written back to the saved file.
    pub fn resolve(&self, cli_override: Option<String>) -> Result<(String, ServerUrlSource)> {
        self.resolve_with_env(cli_override, std::env::var(SERVER_URL_ENV).ok())
    }

    fn resolve_with_env(
        &self,
        cli_override: Option<String>,
        env_url: Option<String>,
    ) -> Result<(String, ServerUrlSource)> {
        let (url, source) = self.determine_with_env(cli_override, env_url)?;
        if source == ServerUrlSource::Cli {
            self.save_server_url(&url)?;
        }
        Ok((url, source))
    }

    fn determine_with_env(
        &self,
        cli_override: Option<String>,
        env_url: Option<String>,
    ) -> Result<(String, ServerUrlSource)> {
        if let Some(url) = cli_override.filter(|url| !url.trim().is_empty()) {
            return Ok((normalize(&url), ServerUrlSource::Cli));
        }

        if let Some(url) = env_url.filter(|url| !url.trim().is_empty()) {
            return Ok((normalize(&url), ServerUrlSource::Environment));
        }

        if let Some(config) = self.config_manager.load_server_config()? {
            return Ok((normalize(&config.server_url), ServerUrlSource::SavedConfig));
        }

        Ok((DEFAULT_SERVER_URL.to_string(), ServerUrlSource::Default))
    }

    pub fn save_server_url(&self, server_url: &str) -> Result<()> {
        let config = ServerConfig {
            server_url: normalize(server_url),
            last_updated: chrono::Utc::now(),
        };
        self.config_manager.save_server_config(&config)
    }

    /// Display-friendly description of a server URL
    pub fn describe(url: &str) -> &'static str {
        if url == DEFAULT_SERVER_URL {
            "Hosted Server (default)"
        } else if url.contains("localhost") || url.contains("127.0.0.1") {
            "Local Development Server"
        } else {
            "Custom Server"
        }
    }
}

fn normalize(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
