use std::path::Path;

use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};

/// Client configuration wrapper.
#[derive(Debug, Clone)]
pub struct Config {
    app: AppConfig,
}

impl Config {
    /// Defaults, then `campus.toml` / `CAMPUS_CONFIG`, then the environment
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self { app: AppConfig::load()? })
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        Ok(Self { app: builder.build()? })
    }

    pub fn from_app(app: AppConfig) -> Result<Self, ConfigError> {
        app.validate()?;
        Ok(Self { app })
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.server_url(), path)
        } else {
            format!("{}/{}", self.server_url(), path)
        }
    }

    /// Backend base URL, without a trailing slash
    pub fn server_url(&self) -> &str {
        &self.app.api_base_url
    }

    pub fn storage_path(&self) -> &Path {
        &self.app.storage_path
    }

    pub fn user_agent(&self) -> &str {
        &self.app.user_agent
    }

    pub fn app(&self) -> &AppConfig {
        &self.app
    }
}
