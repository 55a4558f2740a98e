//! User profile service

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::user::normalize_email;
use crate::domain::{DomainError, Storage, StoreQuery, User, UserId};

/// Request for creating a user profile
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
}

/// Request for updating a user profile; blank fields are ignored
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Maps a store uniqueness violation on email to the user-facing message
fn duplicate_email(error: DomainError) -> DomainError {
    if error.is_conflict() {
        DomainError::conflict("User already exists")
    } else {
        error
    }
}

#[derive(Debug)]
pub struct UserService {
    storage: Arc<dyn Storage<User>>,
}

impl UserService {
    pub fn new(storage: Arc<dyn Storage<User>>) -> Self {
        Self { storage }
    }

    pub async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        let user = User::new(&request.email, &request.name)?;
        self.insert(user).await
    }

    /// Create the profile for an identity the provider already registered
    pub async fn create_with_id(
        &self,
        id: UserId,
        request: CreateUserRequest,
    ) -> Result<User, DomainError> {
        let user = User::with_id(id, &request.email, &request.name)?;
        self.insert(user).await
    }

    async fn insert(&self, user: User) -> Result<User, DomainError> {
        info!(id = %user.id(), "Creating user");
        self.storage.create(user).await.map_err(duplicate_email)
    }

    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        self.storage.list().await
    }

    pub async fn get(&self, id: &str) -> Result<User, DomainError> {
        let user_id = UserId::new(id)?;
        debug!(id = %user_id, "Fetching user");

        self.storage
            .get(&user_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", user_id)))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let query = StoreQuery::new().eq("email", normalize_email(email)).range(0, 1);
        Ok(self.storage.select(&query).await?.into_iter().next())
    }

    pub async fn update(&self, id: &str, request: UpdateUserRequest) -> Result<User, DomainError> {
        info!(id = %id, "Updating user");

        let mut user = self.get(id).await?;

        if let Some(email) = request.email {
            user.set_email(&email);
        }
        if let Some(name) = request.name {
            user.set_name(&name);
        }

        self.storage.update(user).await.map_err(duplicate_email)
    }

    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        info!(id = %id, "Deleting user");

        let user_id = UserId::new(id)?;
        if !self.storage.delete(&user_id).await? {
            return Err(DomainError::not_found(format!("User '{}' not found", user_id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::storage::mock::MockStorage;
    use crate::infrastructure::storage::InMemoryStorage;

    fn create_service() -> UserService {
        UserService::new(Arc::new(InMemoryStorage::<User>::new()))
    }

    fn request(email: &str, name: &str) -> CreateUserRequest {
        CreateUserRequest {
            email: email.to_string(),
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let service = create_service();

        let user = service.create(request(" ann@example.com ", "Ann")).await.unwrap();
        let found = service.get(user.id().as_str()).await.unwrap();

        assert_eq!(found.email(), "ann@example.com");
        assert_eq!(found.name(), "Ann");
    }

    #[tokio::test]
    async fn test_create_requires_email_and_name() {
        let storage = Arc::new(MockStorage::<User>::new());
        let service = UserService::new(storage.clone());

        let err = service.create(request("", "Ann")).await.unwrap_err();

        assert_eq!(err.message(), "Email and Name are required.");
        assert_eq!(storage.calls(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_email_reports_user_exists() {
        let service = create_service();
        service.create(request("ann@example.com", "Ann")).await.unwrap();

        let err = service.create(request("ann@example.com", "Other")).await.unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(err.message(), "User already exists");
    }

    #[tokio::test]
    async fn test_update_ignores_blank_fields() {
        let service = create_service();
        let user = service.create(request("ann@example.com", "Ann")).await.unwrap();

        let updated = service
            .update(
                user.id().as_str(),
                UpdateUserRequest {
                    email: Some("  ".to_string()),
                    name: Some("Annie".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.email(), "ann@example.com");
        assert_eq!(updated.name(), "Annie");
    }

    #[tokio::test]
    async fn test_find_by_email() {
        let service = create_service();
        service.create(request("ann@example.com", "Ann")).await.unwrap();

        assert!(service.find_by_email("ann@example.com").await.unwrap().is_some());
        assert!(service.find_by_email("bob@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_user_is_not_found() {
        let service = create_service();

        assert!(service.get("missing").await.unwrap_err().is_not_found());
        assert!(service.delete("missing").await.unwrap_err().is_not_found());
        assert!(service
            .update("missing", UpdateUserRequest::default())
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_store_error_is_propagated() {
        let storage = MockStorage::<User>::new().with_error("connection refused");
        let service = UserService::new(Arc::new(storage));

        let err = service.list().await.unwrap_err();
        assert!(matches!(err, DomainError::Storage { .. }));
    }
}
