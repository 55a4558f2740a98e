//! User profile entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::entity_id;
use super::storage::StorageEntity;
use super::DomainError;

entity_id!(
    /// User identifier, shared with the identity provider
    UserId,
    "User"
);

/// Canonical form of an email address: trimmed and lower-cased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// A user profile; every other record joins on its id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    email: String,
    name: String,
    #[serde(default = "Utc::now")]
    created_at: DateTime<Utc>,
}

impl User {
    /// Create a profile; both email and name are required
    pub fn new(email: &str, name: &str) -> Result<Self, DomainError> {
        Self::with_id(UserId::generate(), email, name)
    }

    /// Create a profile under an id issued elsewhere (e.g. by the identity provider)
    pub fn with_id(id: UserId, email: &str, name: &str) -> Result<Self, DomainError> {
        let (email, name) = (normalize_email(email), name.trim());

        if email.is_empty() || name.is_empty() {
            return Err(DomainError::validation("Email and Name are required."));
        }

        Ok(Self {
            id,
            email,
            name: name.to_string(),
            created_at: Utc::now(),
        })
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Blank values leave the email unchanged
    pub fn set_email(&mut self, email: &str) {
        let email = normalize_email(email);

        if !email.is_empty() {
            self.email = email;
        }
    }

    /// Blank values leave the name unchanged
    pub fn set_name(&mut self, name: &str) {
        let name = name.trim();

        if !name.is_empty() {
            self.name = name.to_string();
        }
    }
}

impl StorageEntity for User {
    type Key = UserId;
    const TABLE: &'static str = "users";
    const UNIQUE_COLUMNS: &'static [&'static str] = &["email"];

    fn key(&self) -> &Self::Key {
        &self.id
    }
}
