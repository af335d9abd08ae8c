use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RateProviderConfig {
    pub base_url: String,
    pub api_key: String,
}

impl Default for RateProviderConfig {
    fn default() -> Self {
        RateProviderConfig {
            base_url: "https://v6.exchangerate-api.com/v6".to_string(),
            api_key: String::new(),
        }
    }
}

/// Remote identity and profile-store endpoints. When this section is
/// absent the app runs in local-only mode and never requires a session.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct IdentityConfig {
    #[serde(default = "default_identity_base_url")]
    pub base_url: String,
    pub api_key: String,
    /// Base URL of the profile record store; user profiles are written
    /// under `users/{uid}.json`.
    pub database_url: String,
}

fn default_identity_base_url() -> String {
    "https://identitytoolkit.googleapis.com".to_string()
}

/// Pre-selected currency pair for the entry form.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DefaultsConfig {
    pub from_currency: String,
    pub to_currency: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            from_currency: "USD".to_string(),
            to_currency: "PKR".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: RateProviderConfig,
    pub identity: Option<IdentityConfig>,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Rows per dashboard table page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// How long a fetched rate table stays valid in the local cache.
    #[serde(default = "default_rate_ttl_minutes")]
    pub rate_ttl_minutes: u64,
    pub data_path: Option<String>,
}

fn default_page_size() -> usize {
    5
}

fn default_rate_ttl_minutes() -> u64 {
    360
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "fxlog", "fxlog")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    /// Directory holding the record store, the session file and the rate
    /// cache. `data_path` in the config overrides the platform default.
    pub fn data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("dev", "fxlog", "fxlog")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
