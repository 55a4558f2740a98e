//! Storage infrastructure - Storage implementations

mod factory;
mod hosted;
mod in_memory;
pub mod migrations;
mod postgres;

pub use factory::{StorageConfig, StorageFactory, StorageType};
pub use hosted::{HostedConfig, HostedStorage};
pub use in_memory::InMemoryStorage;
pub use migrations::{run_storage_migrations, Migration, PostgresMigrator};
pub use postgres::{PostgresConfig, PostgresStorage};
