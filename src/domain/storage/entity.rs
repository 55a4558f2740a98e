//! Storage entity traits and types

use std::fmt::Debug;

use serde::{Serialize, de::DeserializeOwned};

/// Trait for types that can be used as storage keys
pub trait StorageKey: Clone + Debug + Send + Sync + Eq + std::hash::Hash {
    /// Returns the key as a string for storage backends that require string keys
    fn as_str(&self) -> &str;
}

/// Trait for types that can be stored
pub trait StorageEntity: Clone + Debug + Send + Sync + Serialize + DeserializeOwned {
    /// The key type for this entity
    type Key: StorageKey;

    /// Table (or collection) the entity lives in
    const TABLE: &'static str;

    /// Serialized field holding the key
    const KEY_COLUMN: &'static str = "id";

    /// Serialized fields whose values must be unique across the table
    const UNIQUE_COLUMNS: &'static [&'static str] = &[];

    /// Returns the entity's key
    fn key(&self) -> &Self::Key;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    struct TestKey(String);

    impl StorageKey for TestKey {
        fn as_str(&self) -> &str {
            &self.0
        }
    }

    #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
    struct TestEntity {
        id: TestKey,
        email: String,
    }

    impl StorageEntity for TestEntity {
        type Key = TestKey;
        const TABLE: &'static str = "test_entities";
        const UNIQUE_COLUMNS: &'static [&'static str] = &["email"];

        fn key(&self) -> &Self::Key {
            &self.id
        }
    }

    #[test]
    fn test_storage_entity_defaults() {
        let entity = TestEntity {
            id: TestKey("entity-1".to_string()),
            email: "a@example.com".to_string(),
        };

        assert_eq!(entity.key().as_str(), "entity-1");
        assert_eq!(TestEntity::KEY_COLUMN, "id");
        assert_eq!(TestEntity::UNIQUE_COLUMNS, &["email"]);
    }
}
