use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

use crate::provider::weatherapi::DEFAULT_BASE_URL;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3001";

pub const ENV_API_KEY: &str = "WEATHER_API_KEY";
pub const ENV_PORT: &str = "WEATHER_PORT";
pub const ENV_UPSTREAM_URL: &str = "WEATHER_UPSTREAM_URL";
pub const ENV_BACKEND_URL: &str = "WEATHER_BACKEND_URL";

/// Settings for the proxy server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// WeatherAPI.com key. Lookups fail with a configuration error while unset.
    pub api_key: Option<String>,
    pub port: u16,
    pub upstream_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { api_key: None, port: DEFAULT_PORT, upstream_url: DEFAULT_BASE_URL.to_string() }
    }
}

/// Settings for the terminal client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base address of the proxy server.
    pub backend_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { backend_url: DEFAULT_BACKEND_URL.to_string() }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// [server]
/// api_key = "..."
/// port = 3001
///
/// [client]
/// backend_url = "http://localhost:3001"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub client: ClientConfig,
}

impl Config {
    /// Load config from the default location, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;
        cfg.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(cfg)
    }

    /// Load config from `path`, or return an empty default if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply `WEATHER_*` overrides. `lookup` returns the value of a variable, if set.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_API_KEY) {
            self.server.api_key = Some(key);
        }

        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| anyhow!("{ENV_PORT} must be a port number, got '{port}'"))?;
        }

        if let Some(url) = lookup(ENV_UPSTREAM_URL) {
            self.server.upstream_url = url;
        }

        if let Some(url) = lookup(ENV_BACKEND_URL) {
            self.client.backend_url = url;
        }

        Ok(())
    }

    /// Save config to the default location.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn is_api_key_configured(&self) -> bool {
        self.server.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}
