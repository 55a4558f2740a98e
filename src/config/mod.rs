//! Layered application configuration

mod app_config;

pub use app_config::{
    AppConfig, HostedSettings, IdentityProviderKind, IdentitySettings, LogFormat, LoggingConfig,
    ServerConfig, StorageSettings,
};
