//! Database migrations infrastructure

use sqlx::postgres::PgPool;
use tracing::{debug, info};

use crate::domain::DomainError;

/// PostgreSQL migrator recording applied versions in `_migrations`
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the migrations table if it doesn't exist
    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                success BOOLEAN NOT NULL DEFAULT TRUE
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create migrations table: {}", e)))?;

        Ok(())
    }

    async fn is_applied(&self, version: i64) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = $1)")
            .bind(version)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check migration status: {}", e)))
    }

    /// Runs a single migration unless it was already applied
    pub async fn run_migration(&self, migration: &Migration) -> Result<bool, DomainError> {
        self.ensure_migrations_table().await?;

        if self.is_applied(migration.version).await? {
            debug!(version = migration.version, "Migration already applied");
            return Ok(false);
        }

        sqlx::raw_sql(&migration.up)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to run migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(&migration.description)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to record migration {}: {}",
                    migration.version, e
                ))
            })?;

        info!(
            version = migration.version,
            description = %migration.description,
            "Applied migration"
        );
        Ok(true)
    }

    /// Returns the latest applied migration version
    pub async fn current_version(&self) -> Result<Option<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        sqlx::query_scalar("SELECT MAX(version) FROM _migrations WHERE success = TRUE")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get migration version: {}", e)))
    }
}

/// Represents a database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version
    pub version: i64,
    /// Human-readable description
    pub description: String,
    /// SQL to run when applying the migration
    pub up: String,
}

impl Migration {
    pub fn new(version: i64, description: impl Into<String>, up: impl Into<String>) -> Self {
        Self {
            version,
            description: description.into(),
            up: up.into(),
        }
    }
}

/// A JSONB entity table plus any extra statements (indexes)
fn entity_table(version: i64, table: &str, extra: &str) -> Migration {
    Migration::new(
        version,
        format!("Create {} table", table),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                key VARCHAR(255) PRIMARY KEY,
                data JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            CREATE INDEX IF NOT EXISTS idx_{table}_created_at ON {table}(created_at);
            {extra}
            "#
        ),
    )
}

/// Collection of migrations for the storage layer
pub fn storage_migrations() -> Vec<Migration> {
    vec![
        entity_table(
            1,
            "users",
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email ON users ((data->>'email'));",
        ),
        entity_table(2, "categories", ""),
        entity_table(
            3,
            "transactions",
            "CREATE INDEX IF NOT EXISTS idx_transactions_user_date \
             ON transactions ((data->>'user_id'), (data->>'date'));",
        ),
        entity_table(
            4,
            "budgets",
            "CREATE INDEX IF NOT EXISTS idx_budgets_user ON budgets ((data->>'user_id'));",
        ),
        entity_table(
            5,
            "savings_goals",
            "CREATE INDEX IF NOT EXISTS idx_savings_goals_user \
             ON savings_goals ((data->>'user_id'));",
        ),
        entity_table(6, "credentials", ""),
    ]
}

/// Runs all pending storage migrations, returning how many were applied
pub async fn run_storage_migrations(pool: &PgPool) -> Result<usize, DomainError> {
    let migrator = PostgresMigrator::new(pool.clone());
    let mut applied = 0;

    for migration in storage_migrations() {
        if migrator.run_migration(&migration).await? {
            applied += 1;
        }
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_creation() {
        let migration = Migration::new(1, "Test migration", "CREATE TABLE test");

        assert_eq!(migration.version, 1);
        assert_eq!(migration.description, "Test migration");
        assert_eq!(migration.up, "CREATE TABLE test");
    }

    #[test]
    fn test_storage_migrations_order() {
        let migrations = storage_migrations();

        for pair in migrations.windows(2) {
            assert!(
                pair[1].version > pair[0].version,
                "Migrations should be in ascending order"
            );
        }
    }

    #[test]
    fn test_every_entity_table_is_migrated() {
        let migrations = storage_migrations();

        let tables = [
            "users",
            "categories",
            "transactions",
            "budgets",
            "savings_goals",
            "credentials",
        ];

        for table in tables {
            assert!(
                migrations
                    .iter()
                    .any(|m| m.up.contains(&format!("CREATE TABLE IF NOT EXISTS {} (", table))),
                "missing table {}",
                table
            );
        }
    }

    #[test]
    fn test_users_email_is_unique() {
        let users = &storage_migrations()[0];

        assert!(users.up.contains("CREATE UNIQUE INDEX"));
        assert!(users.up.contains("data->>'email'"));
        assert_eq!(users.description, "Create users table");
    }
}
