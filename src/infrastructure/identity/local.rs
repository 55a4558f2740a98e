//! Self-hosted identity provider: argon2 credentials plus JWT sessions

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::jwt::JwtService;
use super::password::{validate_password, PasswordHasher};
use crate::domain::id::entity_id;
use crate::domain::storage::{Storage, StorageEntity};
use crate::domain::user::normalize_email;
use crate::domain::{DomainError, Identity, IdentityProvider, Session};

entity_id!(
    /// Lower-cased email used as the credential key
    CredentialEmail,
    "Email"
);

/// Stored login for one account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    email: CredentialEmail,
    identity_id: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl StorageEntity for Credential {
    type Key = CredentialEmail;
    const TABLE: &'static str = "credentials";
    const KEY_COLUMN: &'static str = "email";

    fn key(&self) -> &Self::Key {
        &self.email
    }
}

fn credential_email(email: &str) -> Result<CredentialEmail, DomainError> {
    CredentialEmail::new(normalize_email(email))
}

const INVALID_CREDENTIALS: &str = "Invalid login credentials";

/// Identity provider backed by the application's own storage
#[derive(Debug)]
pub struct LocalIdentityProvider {
    credentials: Arc<dyn Storage<Credential>>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: JwtService,
}

impl LocalIdentityProvider {
    pub fn new(
        credentials: Arc<dyn Storage<Credential>>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: JwtService,
    ) -> Self {
        Self {
            credentials,
            hasher,
            tokens,
        }
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, DomainError> {
        let key = credential_email(email)?;
        validate_password(password)?;

        if self.credentials.exists(&key).await? {
            return Err(DomainError::conflict("User already registered"));
        }

        let credential = Credential {
            identity_id: Uuid::new_v4().to_string(),
            password_hash: self.hasher.hash(password)?,
            email: key,
            created_at: Utc::now(),
        };

        let credential = self.credentials.create(credential).await?;
        info!(identity_id = %credential.identity_id, "Registered local identity");

        Ok(Identity {
            id: credential.identity_id,
            email: credential.email.to_string(),
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, DomainError> {
        let key = credential_email(email)?;

        let credential = match self.credentials.get(&key).await? {
            Some(credential) if self.hasher.verify(password, &credential.password_hash) => {
                credential
            }
            _ => {
                debug!("Rejected local sign-in");
                return Err(DomainError::identity(INVALID_CREDENTIALS));
            }
        };

        let identity = Identity {
            id: credential.identity_id,
            email: credential.email.to_string(),
        };
        let (access_token, claims) = self.tokens.issue(&identity)?;

        Ok(Session {
            access_token,
            expires_at: claims.expires_at(),
            identity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::identity::jwt::JwtConfig;
    use crate::infrastructure::identity::password::Argon2Hasher;
    use crate::infrastructure::storage::InMemoryStorage;

    fn provider() -> LocalIdentityProvider {
        LocalIdentityProvider::new(
            Arc::new(InMemoryStorage::<Credential>::new()),
            Arc::new(Argon2Hasher::new()),
            JwtService::new(JwtConfig::new("test-secret", 1)),
        )
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let provider = provider();

        let identity = provider.sign_up("Ann@Example.com", "hunter22").await.unwrap();
        assert_eq!(identity.email, "ann@example.com");

        let session = provider.sign_in(" ann@example.com ", "hunter22").await.unwrap();
        assert_eq!(session.identity, identity);
        assert!(!session.access_token.is_empty());
        assert!(session.expires_at.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_sign_up_conflicts() {
        let provider = provider();
        provider.sign_up("ann@example.com", "hunter22").await.unwrap();

        let err = provider.sign_up("ANN@example.com", "other-pass").await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_the_same() {
        let provider = provider();
        provider.sign_up("ann@example.com", "hunter22").await.unwrap();

        let wrong = provider.sign_in("ann@example.com", "nope-nope").await.unwrap_err();
        let unknown = provider.sign_in("bob@example.com", "hunter22").await.unwrap_err();

        assert_eq!(wrong.message(), INVALID_CREDENTIALS);
        assert_eq!(unknown.message(), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let err = provider().sign_up("ann@example.com", "123").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }
}
