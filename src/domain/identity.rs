//! External identity provider abstraction

use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use super::DomainError;

/// An account known to the identity provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
}

/// A signed-in session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub identity: Identity,
}

/// Credential and session handling delegated outside the application
#[cfg_attr(test, automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a new account
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, DomainError>;

    /// Exchange credentials for a session
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, DomainError>;
}
