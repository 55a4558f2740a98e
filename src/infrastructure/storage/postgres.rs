//! PostgreSQL storage implementation with connection pooling

use std::fmt::Debug;
use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use crate::domain::storage::{Storage, StorageEntity, StorageKey, StoreQuery};
use crate::domain::DomainError;

/// PostgreSQL storage configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/fintrack".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Opens a connection pool for this configuration
    pub async fn connect(&self) -> Result<PgPool, DomainError> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(std::time::Duration::from_secs(self.connect_timeout_secs))
            .connect(&self.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))
    }
}

/// PostgreSQL storage implementation
///
/// Each entity type lives in its own table of `(key, data JSONB, created_at,
/// updated_at)` rows. Query filters compare `data->>'column'` as text, which
/// orders ISO dates correctly. Unique columns are enforced by expression
/// indexes created in the migrations.
pub struct PostgresStorage<E>
where
    E: StorageEntity,
{
    pool: PgPool,
    _phantom: PhantomData<E>,
}

impl<E> Debug for PostgresStorage<E>
where
    E: StorageEntity,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresStorage")
            .field("table_name", &E::TABLE)
            .finish()
    }
}

impl<E> PostgresStorage<E>
where
    E: StorageEntity,
{
    /// Creates a storage over a shared pool
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _phantom: PhantomData,
        }
    }

    fn decode(row: &PgRow) -> Result<E, DomainError> {
        let data: serde_json::Value = row.get("data");
        serde_json::from_value(data)
            .map_err(|e| DomainError::storage(format!("Failed to deserialize entity: {}", e)))
    }

    fn encode(entity: &E) -> Result<serde_json::Value, DomainError> {
        serde_json::to_value(entity)
            .map_err(|e| DomainError::storage(format!("Failed to serialize entity: {}", e)))
    }
}

/// SQL text plus its text bind parameters, in order
#[derive(Debug, Clone, PartialEq)]
struct SqlQuery {
    sql: String,
    binds: Vec<String>,
}

fn where_clause(query: &StoreQuery, binds: &mut Vec<String>) -> String {
    let conditions: Vec<String> = query
        .filters()
        .iter()
        .map(|filter| {
            binds.push(filter.column.clone());
            let column = binds.len();
            binds.push(filter.value.clone());
            let value = binds.len();

            format!("data->>${} {} ${}", column, filter.op.as_sql(), value)
        })
        .collect();

    if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    }
}

fn build_select(table: &str, query: &StoreQuery) -> SqlQuery {
    let mut binds = Vec::new();
    let mut sql = format!("SELECT data FROM {}", table);
    sql.push_str(&where_clause(query, &mut binds));

    match query.order() {
        Some(order) => {
            binds.push(order.column.clone());
            sql.push_str(&format!(
                " ORDER BY data->>${} {} NULLS LAST, created_at",
                binds.len(),
                order.direction.as_sql()
            ));
        }
        None => sql.push_str(" ORDER BY created_at"),
    }

    if let Some(limit) = query.limit() {
        sql.push_str(&format!(" LIMIT {}", limit));
    }
    if let Some(offset) = query.offset() {
        sql.push_str(&format!(" OFFSET {}", offset));
    }

    SqlQuery { sql, binds }
}

fn build_count(table: &str, query: &StoreQuery) -> SqlQuery {
    let mut binds = Vec::new();
    let mut sql = format!("SELECT COUNT(*) AS count FROM {}", table);
    sql.push_str(&where_clause(query, &mut binds));

    SqlQuery { sql, binds }
}

/// Unique violations (SQLSTATE 23505) become conflicts
fn map_write_error(action: &str, error: sqlx::Error) -> DomainError {
    let unique_violation = error
        .as_database_error()
        .is_some_and(|e| e.is_unique_violation());

    if unique_violation {
        DomainError::conflict(error.to_string())
    } else {
        DomainError::storage(format!("Failed to {}: {}", action, error))
    }
}

#[async_trait]
impl<E> Storage<E> for PostgresStorage<E>
where
    E: StorageEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        let query = format!("SELECT data FROM {} WHERE key = $1", E::TABLE);

        let row = sqlx::query(&query)
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get entity: {}", e)))?;

        row.as_ref().map(Self::decode).transpose()
    }

    async fn select(&self, query: &StoreQuery) -> Result<Vec<E>, DomainError> {
        let built = build_select(E::TABLE, query);
        let mut statement = sqlx::query(&built.sql);

        for bind in &built.binds {
            statement = statement.bind(bind);
        }

        let rows = statement
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to select entities: {}", e)))?;

        rows.iter().map(Self::decode).collect()
    }

    async fn create(&self, entity: E) -> Result<E, DomainError> {
        let data = Self::encode(&entity)?;
        let query = format!("INSERT INTO {} (key, data) VALUES ($1, $2)", E::TABLE);

        sqlx::query(&query)
            .bind(entity.key().as_str())
            .bind(&data)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error("create entity", e))?;

        Ok(entity)
    }

    async fn update(&self, entity: E) -> Result<E, DomainError> {
        let data = Self::encode(&entity)?;
        let query = format!(
            "UPDATE {} SET data = $2, updated_at = NOW() WHERE key = $1",
            E::TABLE
        );

        let result = sqlx::query(&query)
            .bind(entity.key().as_str())
            .bind(&data)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error("update entity", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Entity with key '{}' not found",
                entity.key().as_str()
            )));
        }

        Ok(entity)
    }

    async fn delete(&self, key: &E::Key) -> Result<bool, DomainError> {
        let query = format!("DELETE FROM {} WHERE key = $1", E::TABLE);

        let result = sqlx::query(&query)
            .bind(key.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete entity: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, key: &E::Key) -> Result<bool, DomainError> {
        let query = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE key = $1) AS exists",
            E::TABLE
        );

        let row = sqlx::query(&query)
            .bind(key.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check existence: {}", e)))?;

        Ok(row.get("exists"))
    }

    async fn count(&self, query: &StoreQuery) -> Result<usize, DomainError> {
        let built = build_count(E::TABLE, query);
        let mut statement = sqlx::query(&built.sql);

        for bind in &built.binds {
            statement = statement.bind(bind);
        }

        let row = statement
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count entities: {}", e)))?;

        let count: i64 = row.get("count");
        Ok(count as usize)
    }
}
