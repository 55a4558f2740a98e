//! FinTrack API
//!
//! Personal finance tracking:
//! - Income and expense transactions grouped by category
//! - Monthly per-category budgets checked against actual spending
//! - Savings goals with progress tracking
//! - Pluggable storage (in-memory, PostgreSQL, hosted table API)

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use config::IdentityProviderKind;
use domain::IdentityProvider;
use infrastructure::identity::{
    Argon2Hasher, Credential, HostedIdentityProvider, JwtConfig, JwtService,
    LocalIdentityProvider,
};
use infrastructure::storage::StorageFactory;
use rand::Rng;
use tracing::info;

/// Create the application state from configuration
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage_config = config.storage_config()?;
    info!(backend = ?storage_config.storage_type(), "Connecting storage");

    let storage = StorageFactory::connect(&storage_config).await?;
    let identity = create_identity_provider(config, &storage)?;

    Ok(AppState::new(&storage, identity))
}

fn create_identity_provider(
    config: &AppConfig,
    storage: &StorageFactory,
) -> anyhow::Result<Arc<dyn IdentityProvider>> {
    match config.identity.provider {
        IdentityProviderKind::Hosted => {
            info!("Using hosted identity provider");
            Ok(Arc::new(HostedIdentityProvider::new(
                reqwest::Client::new(),
                config.hosted_config()?,
            )))
        }
        IdentityProviderKind::Local => {
            info!("Using local identity provider");
            let secret = config.jwt_secret().unwrap_or_else(|| {
                tracing::warn!(
                    "No JWT secret configured. Generating random secret. \
                    Sessions will NOT persist across restarts."
                );
                generate_random_secret()
            });

            Ok(Arc::new(LocalIdentityProvider::new(
                storage.create::<Credential>(),
                Arc::new(Argon2Hasher::new()),
                JwtService::new(JwtConfig::new(
                    secret,
                    config.identity.token_expiration_hours,
                )),
            )))
        }
    }
}

fn generate_random_secret() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}
