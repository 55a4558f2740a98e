//! Storage factory for runtime storage selection

use std::sync::Arc;

use sqlx::postgres::PgPool;
use tracing::info;

use crate::domain::storage::{Storage, StorageEntity};
use crate::domain::DomainError;

use super::hosted::{HostedConfig, HostedStorage};
use super::in_memory::InMemoryStorage;
use super::migrations::run_storage_migrations;
use super::postgres::{PostgresConfig, PostgresStorage};

/// Supported storage types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
    /// Hosted table API
    Hosted,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            "hosted" | "rest" | "supabase" => Some(Self::Hosted),
            _ => None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    InMemory,
    Postgres(PostgresConfig),
    Hosted(HostedConfig),
}

impl StorageConfig {
    /// Returns the storage type
    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
            Self::Hosted(_) => StorageType::Hosted,
        }
    }
}

/// Connected backend that hands out one storage per entity type
///
/// Database backends share a single pool or HTTP client across entities.
#[derive(Debug, Clone)]
pub enum StorageFactory {
    InMemory,
    Postgres(PgPool),
    Hosted {
        client: reqwest::Client,
        config: HostedConfig,
    },
}

impl StorageFactory {
    /// Connects to the configured backend, applying migrations for PostgreSQL
    pub async fn connect(config: &StorageConfig) -> Result<Self, DomainError> {
        match config {
            StorageConfig::InMemory => {
                info!("Using in-memory storage");
                Ok(Self::InMemory)
            }
            StorageConfig::Postgres(pg_config) => {
                let pool = pg_config.connect().await?;
                let applied = run_storage_migrations(&pool).await?;
                info!(applied, "Using PostgreSQL storage");
                Ok(Self::Postgres(pool))
            }
            StorageConfig::Hosted(hosted_config) => {
                info!(url = %hosted_config.url, "Using hosted storage");
                Ok(Self::Hosted {
                    client: reqwest::Client::new(),
                    config: hosted_config.clone(),
                })
            }
        }
    }

    /// Creates the storage for one entity type
    pub fn create<E>(&self) -> Arc<dyn Storage<E>>
    where
        E: StorageEntity + 'static,
    {
        match self {
            Self::InMemory => Arc::new(InMemoryStorage::<E>::new()),
            Self::Postgres(pool) => Arc::new(PostgresStorage::<E>::new(pool.clone())),
            Self::Hosted { client, config } => {
                Arc::new(HostedStorage::<E>::new(client.clone(), config.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;

    #[test]
    fn test_storage_type_from_str() {
        assert_eq!(StorageType::from_str("memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::from_str("in-memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::from_str("Postgres"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("pg"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("hosted"), Some(StorageType::Hosted));
        assert_eq!(StorageType::from_str("supabase"), Some(StorageType::Hosted));
        assert_eq!(StorageType::from_str("unknown"), None);
    }

    #[test]
    fn test_storage_config_types() {
        assert_eq!(StorageConfig::InMemory.storage_type(), StorageType::InMemory);
        let postgres = PostgresConfig::new("postgres://localhost/test");
        assert_eq!(
            StorageConfig::Postgres(postgres).storage_type(),
            StorageType::Postgres
        );
        assert_eq!(
            StorageConfig::Hosted(HostedConfig::new("https://x.example.co", "key")).storage_type(),
            StorageType::Hosted
        );
    }

    #[tokio::test]
    async fn test_in_memory_factory_creates_independent_stores() {
        let factory = StorageFactory::connect(&StorageConfig::InMemory).await.unwrap();
        let first = factory.create::<Category>();
        let second = factory.create::<Category>();

        first.create(Category::new("Food").unwrap()).await.unwrap();

        assert_eq!(first.list().await.unwrap().len(), 1);
        assert!(second.list().await.unwrap().is_empty());
    }
}
