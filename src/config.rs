use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding `api.key`
pub const API_KEY_ENV: &str = "RAWG_API_KEY";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub library: LibraryConfig,
}

/// RAWG API access settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API key sent with every request
    #[serde(default)]
    pub key: Option<String>,
    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.rawg.io/api".to_string()
}

fn default_timeout() -> u64 {
    10
}

/// Browse listing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Number of games requested for the browse listing
    #[serde(default = "default_fetch_size")]
    pub fetch_size: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            fetch_size: default_fetch_size(),
        }
    }
}

fn default_fetch_size() -> u32 {
    20
}

/// Search-as-you-type settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period before a query is sent, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Maximum number of search results
    #[serde(default = "default_result_limit")]
    pub result_limit: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            result_limit: default_result_limit(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_result_limit() -> u32 {
    5
}

/// Saved library settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Directory holding the library file (platform data dir if unset)
    #[serde(default)]
    pub path: Option<String>,
}

impl Config {
    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("com", "gamehub", "GameHub")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        let config_dir = dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from file, then apply environment overrides.
    ///
    /// The result is the runtime view; use `load_file` for anything that is
    /// written back with `save`.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        config.apply_env(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    /// Load configuration from file only, without environment overrides
    pub fn load_file() -> Result<Self> {
        Self::read_from(&Self::config_path()?)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.write_to(&Self::config_path()?)
    }

    pub(crate) fn read_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            tracing::info!("Loaded configuration from {:?}", path);
            Ok(config)
        } else {
            tracing::info!("No configuration file found, using defaults");
            Ok(Self::default())
        }
    }

    pub(crate) fn write_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        tracing::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Override the API key from the environment, ignoring blank values
    fn apply_env(&mut self, api_key: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.api.key = Some(key);
        }
    }

    /// Directory holding persisted user data
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.library.path {
            Some(path) => Ok(PathBuf::from(path)),
            None => crate::library::FileStore::default_dir(),
        }
    }
}
