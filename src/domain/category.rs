use serde::{Deserialize, Serialize};

use super::id::entity_id;
use super::storage::StorageEntity;
use super::DomainError;

entity_id!(CategoryId, "Category");

/// A flat label shared by transactions and budgets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    id: CategoryId,
    name: String,
}

impl Category {
    pub fn new(name: &str) -> Result<Self, DomainError> {
        let name = name.trim();

        if name.is_empty() {
            return Err(DomainError::validation("Category name is required."));
        }

        Ok(Self {
            id: CategoryId::generate(),
            name: name.to_string(),
        })
    }

    pub fn id(&self) -> &CategoryId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        let name = name.trim();

        if !name.is_empty() {
            self.name = name.to_string();
        }
    }
}

impl StorageEntity for Category {
    type Key = CategoryId;
    const TABLE: &'static str = "categories";

    fn key(&self) -> &Self::Key {
        &self.id
    }
}
