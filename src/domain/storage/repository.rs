//! Storage trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

use super::entity::StorageEntity;
use super::query::StoreQuery;

/// Generic storage trait for CRUD operations on any entity type
#[async_trait]
pub trait Storage<E>: Send + Sync + Debug
where
    E: StorageEntity + 'static,
{
    /// Retrieves an entity by its key
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError>;

    /// Retrieves the entities matching a query
    async fn select(&self, query: &StoreQuery) -> Result<Vec<E>, DomainError>;

    /// Retrieves all entities in insertion order
    async fn list(&self) -> Result<Vec<E>, DomainError> {
        self.select(&StoreQuery::new()).await
    }

    /// Creates a new entity, returns a conflict if the key or a unique column is taken
    async fn create(&self, entity: E) -> Result<E, DomainError>;

    /// Replaces an existing entity, returns not found if the key is unknown
    async fn update(&self, entity: E) -> Result<E, DomainError>;

    /// Deletes an entity by its key, returns true if deleted
    async fn delete(&self, key: &E::Key) -> Result<bool, DomainError>;

    /// Checks if an entity exists by its key
    async fn exists(&self, key: &E::Key) -> Result<bool, DomainError> {
        Ok(self.get(key).await?.is_some())
    }

    /// Counts the entities matching a query's filters
    async fn count(&self, query: &StoreQuery) -> Result<usize, DomainError> {
        Ok(self.select(query).await?.len())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::domain::storage::StorageKey;

    /// Recording storage for service tests
    ///
    /// Counts every call so tests can assert that validation failed before
    /// the store was touched, and can be switched into a failing mode.
    #[derive(Debug)]
    pub struct MockStorage<E>
    where
        E: StorageEntity,
    {
        entities: Mutex<Vec<E>>,
        error: Mutex<Option<String>>,
        calls: AtomicUsize,
    }

    impl<E> Default for MockStorage<E>
    where
        E: StorageEntity,
    {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<E> MockStorage<E>
    where
        E: StorageEntity,
    {
        pub fn new() -> Self {
            Self {
                entities: Mutex::new(Vec::new()),
                error: Mutex::new(None),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn with_entity(self, entity: E) -> Self {
            self.entities.lock().unwrap().push(entity);
            self
        }

        pub fn with_error(self, error: impl Into<String>) -> Self {
            *self.error.lock().unwrap() = Some(error.into());
            self
        }

        /// Number of storage calls made so far
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn record_call(&self) -> Result<(), DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if let Some(error) = self.error.lock().unwrap().clone() {
                return Err(DomainError::storage(error));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl<E> Storage<E> for MockStorage<E>
    where
        E: StorageEntity + 'static,
    {
        async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
            self.record_call()?;
            Ok(self
                .entities
                .lock()
                .unwrap()
                .iter()
                .find(|e| e.key() == key)
                .cloned())
        }

        async fn select(&self, query: &StoreQuery) -> Result<Vec<E>, DomainError> {
            self.record_call()?;
            let entities = self.entities.lock().unwrap();

            Ok(entities
                .iter()
                .filter(|e| {
                    serde_json::to_value(e)
                        .map(|json| query.matches(&json))
                        .unwrap_or(false)
                })
                .cloned()
                .collect())
        }

        async fn create(&self, entity: E) -> Result<E, DomainError> {
            self.record_call()?;
            let mut entities = self.entities.lock().unwrap();

            if entities.iter().any(|e| e.key() == entity.key()) {
                return Err(DomainError::conflict(format!(
                    "Entity with key '{}' already exists",
                    entity.key().as_str()
                )));
            }

            entities.push(entity.clone());
            Ok(entity)
        }

        async fn update(&self, entity: E) -> Result<E, DomainError> {
            self.record_call()?;
            let mut entities = self.entities.lock().unwrap();

            let slot = entities
                .iter_mut()
                .find(|e| e.key() == entity.key())
                .ok_or_else(|| {
                    DomainError::not_found(format!(
                        "Entity with key '{}' not found",
                        entity.key().as_str()
                    ))
                })?;

            *slot = entity.clone();
            Ok(entity)
        }

        async fn delete(&self, key: &E::Key) -> Result<bool, DomainError> {
            self.record_call()?;
            let mut entities = self.entities.lock().unwrap();
            let before = entities.len();
            entities.retain(|e| e.key() != key);
            Ok(entities.len() < before)
        }
    }
}
