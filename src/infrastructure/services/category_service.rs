//! Category service

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::domain::{Category, CategoryId, DomainError, Storage};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCategoryRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
}

#[derive(Debug)]
pub struct CategoryService {
    storage: Arc<dyn Storage<Category>>,
}

impl CategoryService {
    pub fn new(storage: Arc<dyn Storage<Category>>) -> Self {
        Self { storage }
    }

    pub async fn create(&self, request: CreateCategoryRequest) -> Result<Category, DomainError> {
        let category = Category::new(&request.name)?;
        info!(id = %category.id(), name = %category.name(), "Creating category");

        self.storage.create(category).await
    }

    pub async fn list(&self) -> Result<Vec<Category>, DomainError> {
        self.storage.list().await
    }

    pub async fn get(&self, id: &str) -> Result<Category, DomainError> {
        let category_id = CategoryId::new(id)?;

        self.storage
            .get(&category_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Category '{}' not found", category_id)))
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateCategoryRequest,
    ) -> Result<Category, DomainError> {
        info!(id = %id, "Updating category");

        let mut category = self.get(id).await?;

        if let Some(name) = request.name {
            category.set_name(&name);
        }

        self.storage.update(category).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        info!(id = %id, "Deleting category");

        let category_id = CategoryId::new(id)?;
        if !self.storage.delete(&category_id).await? {
            return Err(DomainError::not_found(format!("Category '{}' not found", category_id)));
        }
        Ok(())
    }
}
