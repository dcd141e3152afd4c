//! Application configuration module
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then environment variables.
//!
//! ```toml
//! # campus.toml
//! api_url = "https://campus.example.edu/api"
//! data_dir = "/var/lib/campus-connect"
//! ```

use std::path::{Path, PathBuf};

use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

/// Default backend base URL (the `/api` mount of the campus backend)
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Environment variable overriding the backend base URL
pub const API_URL_ENV: &str = "CAMPUS_API_URL";

/// Environment variable overriding the directory holding the session database
pub const DATA_DIR_ENV: &str = "CAMPUS_DATA_DIR";

/// Environment variable naming an explicit configuration file
pub const CONFIG_FILE_ENV: &str = "CAMPUS_CONFIG";

/// Configuration file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "campus.toml";

const STORAGE_DIR: &str = "campus-connect";
const STORAGE_FILE: &str = "session.db";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Backend base URL without a trailing slash
    pub api_base_url: String,
    /// SQLite file holding the durable tokens
    pub storage_path: PathBuf,
    /// User-Agent sent with every request
    pub user_agent: String,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load configuration from the config file (if any) and the environment.
    ///
    /// An explicit `CAMPUS_CONFIG` path must exist; the default
    /// `campus.toml` is optional.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Self::builder();

        match std::env::var(CONFIG_FILE_ENV) {
            Ok(path) => builder = builder.merge_file(Path::new(&path))?,
            Err(_) => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    builder = builder.merge_file(path)?;
                }
            }
        }

        builder.merge_env().build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        normalize_base_url(&self.api_base_url).map(|_| ())
    }
}

/// Keys accepted in `campus.toml`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_url: Option<String>,
    data_dir: Option<PathBuf>,
    user_agent: Option<String>,
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    api_base_url: Option<String>,
    data_dir: Option<PathBuf>,
    storage_path: Option<PathBuf>,
    user_agent: Option<String>,
}

impl AppConfigBuilder {
    /// Set the backend base URL
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Set the directory that holds `session.db`
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Set the exact session database path (wins over `data_dir`)
    pub fn storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = Some(path.into());
        self
    }

    /// Set the User-Agent header value
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Layer a TOML file over the current values
    pub fn merge_file(self, path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.merge_toml(&text)
    }

    /// Layer TOML text over the current values
    pub fn merge_toml(mut self, text: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(text)?;
        if let Some(url) = file.api_url {
            self.api_base_url = Some(url);
        }
        if let Some(dir) = file.data_dir {
            self.data_dir = Some(dir);
        }
        if let Some(agent) = file.user_agent {
            self.user_agent = Some(agent);
        }
        Ok(self)
    }

    /// Layer `CAMPUS_API_URL` and `CAMPUS_DATA_DIR` over the current values
    pub fn merge_env(mut self) -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            self.api_base_url = Some(url);
        }
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let api_base_url = normalize_base_url(
            self.api_base_url.as_deref().unwrap_or(DEFAULT_API_URL),
        )?;

        let storage_path = match (self.storage_path, self.data_dir) {
            (Some(path), _) => path,
            (None, Some(dir)) => dir.join(STORAGE_FILE),
            (None, None) => default_storage_path(),
        };

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("campus-connect/{}", env!("CARGO_PKG_VERSION")));

        Ok(AppConfig {
            api_base_url,
            storage_path,
            user_agent,
        })
    }
}

/// Platform data directory, falling back to the temp dir
fn default_storage_path() -> PathBuf {
    let mut path = dirs::data_dir().unwrap_or_else(std::env::temp_dir);
    path.push(STORAGE_DIR);
    path.push(STORAGE_FILE);
    path
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|_| ConfigError::InvalidUrl(raw.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(raw.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}
