//! In-memory storage implementation

use std::fmt::Debug;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::storage::{Storage, StorageEntity, StorageKey, StoreQuery};
use crate::domain::DomainError;

/// Thread-safe in-memory storage implementation
///
/// Keeps insertion order and enforces the entity's unique columns, so it
/// behaves like the database backends for tests and local development.
/// Data is lost when the process terminates.
#[derive(Debug)]
pub struct InMemoryStorage<E>
where
    E: StorageEntity,
{
    rows: RwLock<Vec<Row<E>>>,
}

#[derive(Debug, Clone)]
struct Row<E> {
    json: Value,
    entity: E,
}

impl<E> Row<E>
where
    E: StorageEntity,
{
    fn new(entity: E) -> Result<Self, DomainError> {
        let json = serde_json::to_value(&entity)
            .map_err(|e| DomainError::storage(format!("Failed to serialize entity: {}", e)))?;
        Ok(Self { json, entity })
    }
}

impl<E> Default for InMemoryStorage<E>
where
    E: StorageEntity,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> InMemoryStorage<E>
where
    E: StorageEntity,
{
    /// Creates a new empty in-memory storage
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<Row<E>>>, DomainError> {
        self.rows
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<Row<E>>>, DomainError> {
        self.rows
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))
    }

    fn check_unique(rows: &[Row<E>], candidate: &Row<E>) -> Result<(), DomainError> {
        for column in E::UNIQUE_COLUMNS {
            let Some(value) = candidate.json.get(*column).filter(|v| !v.is_null()) else {
                continue;
            };

            let taken = rows.iter().any(|row| {
                row.entity.key() != candidate.entity.key() && row.json.get(*column) == Some(value)
            });

            if taken {
                return Err(DomainError::conflict(format!(
                    "duplicate key value violates unique constraint on {}.{}",
                    E::TABLE,
                    column
                )));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<E> Storage<E> for InMemoryStorage<E>
where
    E: StorageEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        let rows = self.read()?;

        Ok(rows
            .iter()
            .find(|row| row.entity.key() == key)
            .map(|row| row.entity.clone()))
    }

    async fn select(&self, query: &StoreQuery) -> Result<Vec<E>, DomainError> {
        let rows = self.read()?;

        let mut matching: Vec<&Row<E>> =
            rows.iter().filter(|row| query.matches(&row.json)).collect();

        // Stable sort keeps insertion order among equal values
        if query.order().is_some() {
            matching.sort_by(|a, b| query.compare(&a.json, &b.json));
        }

        let offset = query.offset().unwrap_or(0);
        let limit = query.limit().unwrap_or(usize::MAX);

        Ok(matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|row| row.entity.clone())
            .collect())
    }

    async fn create(&self, entity: E) -> Result<E, DomainError> {
        let row = Row::new(entity)?;
        let mut rows = self.write()?;

        if rows.iter().any(|existing| existing.entity.key() == row.entity.key()) {
            return Err(DomainError::conflict(format!(
                "Entity with key '{}' already exists",
                row.entity.key().as_str()
            )));
        }

        Self::check_unique(&rows, &row)?;

        let entity = row.entity.clone();
        rows.push(row);
        Ok(entity)
    }

    async fn update(&self, entity: E) -> Result<E, DomainError> {
        let row = Row::new(entity)?;
        let mut rows = self.write()?;

        let position = rows
            .iter()
            .position(|existing| existing.entity.key() == row.entity.key())
            .ok_or_else(|| {
                DomainError::not_found(format!(
                    "Entity with key '{}' not found",
                    row.entity.key().as_str()
                ))
            })?;

        Self::check_unique(&rows, &row)?;

        let entity = row.entity.clone();
        rows[position] = row;
        Ok(entity)
    }

    async fn delete(&self, key: &E::Key) -> Result<bool, DomainError> {
        let mut rows = self.write()?;
        let before = rows.len();

        rows.retain(|row| row.entity.key() != key);

        Ok(rows.len() < before)
    }

    async fn count(&self, query: &StoreQuery) -> Result<usize, DomainError> {
        let rows = self.read()?;
        Ok(rows.iter().filter(|row| query.matches(&row.json)).count())
    }
}
