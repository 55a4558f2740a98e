use serde::Deserialize;

use crate::domain::DomainError;
use crate::infrastructure::storage::{HostedConfig, PostgresConfig, StorageConfig, StorageType};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageSettings,
    pub hosted: HostedSettings,
    pub identity: IdentitySettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// `memory`, `postgres` or `hosted`
    pub backend: String,
    /// Falls back to the `DATABASE_URL` environment variable
    pub database_url: Option<String>,
    pub max_connections: u32,
}

/// Base URL and key of the hosted backend (table and auth APIs)
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct HostedSettings {
    pub url: Option<String>,
    pub api_key: Option<String>,
}

impl std::fmt::Debug for HostedSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostedSettings")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[hidden]"))
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdentityProviderKind {
    #[default]
    Local,
    Hosted,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct IdentitySettings {
    pub provider: IdentityProviderKind,
    /// Signing secret for locally issued sessions; falls back to `JWT_SECRET`
    pub jwt_secret: Option<String>,
    pub token_expiration_hours: u64,
}

impl std::fmt::Debug for IdentitySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentitySettings")
            .field("provider", &self.provider)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "[hidden]"))
            .field("token_expiration_hours", &self.token_expiration_hours)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            database_url: None,
            max_connections: 10,
        }
    }
}

impl Default for IdentitySettings {
    fn default() -> Self {
        Self {
            provider: IdentityProviderKind::default(),
            jwt_secret: None,
            token_expiration_hours: 24,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// PostgreSQL URL from the config file or `DATABASE_URL`
    pub fn database_url(&self) -> Option<String> {
        self.storage
            .database_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| std::env::var("DATABASE_URL").ok())
    }

    /// Hosted backend connection; both URL and key must be set
    pub fn hosted_config(&self) -> Result<HostedConfig, DomainError> {
        match (&self.hosted.url, &self.hosted.api_key) {
            (Some(url), Some(key)) if !url.trim().is_empty() && !key.trim().is_empty() => {
                Ok(HostedConfig::new(url.trim(), key.trim()))
            }
            _ => Err(DomainError::configuration(
                "hosted.url and hosted.api_key are required for the hosted backend",
            )),
        }
    }

    /// Resolve the storage backend settings
    pub fn storage_config(&self) -> Result<StorageConfig, DomainError> {
        let backend = StorageType::from_str(&self.storage.backend).ok_or_else(|| {
            DomainError::configuration(format!(
                "Unknown storage backend '{}'. Use 'memory', 'postgres' or 'hosted'.",
                self.storage.backend
            ))
        })?;

        match backend {
            StorageType::InMemory => Ok(StorageConfig::InMemory),
            StorageType::Postgres => {
                let url = self.database_url().ok_or_else(|| {
                    DomainError::configuration(
                        "storage.database_url or DATABASE_URL is required for the postgres backend",
                    )
                })?;
                Ok(StorageConfig::Postgres(
                    PostgresConfig::new(url).with_max_connections(self.storage.max_connections),
                ))
            }
            StorageType::Hosted => Ok(StorageConfig::Hosted(self.hosted_config()?)),
        }
    }

    /// Session signing secret from config or `JWT_SECRET`
    pub fn jwt_secret(&self) -> Option<String> {
        self.identity
            .jwt_secret
            .clone()
            .filter(|secret| !secret.is_empty())
            .or_else(|| std::env::var("JWT_SECRET").ok())
    }
}
