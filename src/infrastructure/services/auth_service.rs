//! Sign-up and sign-in on top of the identity provider and user profiles

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::user_service::{CreateUserRequest, UserService};
use crate::domain::{DomainError, IdentityProvider, User, UserId};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignUpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// A signed-in user with the provider's session token
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub user: User,
}

pub struct AuthService {
    provider: Arc<dyn IdentityProvider>,
    users: Arc<UserService>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService").field("users", &self.users).finish()
    }
}

impl AuthService {
    pub fn new(provider: Arc<dyn IdentityProvider>, users: Arc<UserService>) -> Self {
        Self { provider, users }
    }

    /// Register with the provider, then create the matching profile
    ///
    /// The two steps are not atomic: a profile failure leaves the provider
    /// account in place and fails the whole call.
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<User, DomainError> {
        let email = request.email.trim();

        if email.is_empty() || request.password.is_empty() || request.name.trim().is_empty() {
            return Err(DomainError::validation("Email, Password and Name are required."));
        }

        let identity = self.provider.sign_up(email, &request.password).await?;
        info!(identity_id = %identity.id, "Identity registered, creating profile");

        let profile = CreateUserRequest {
            email: email.to_string(),
            name: request.name,
        };

        self.users
            .create_with_id(UserId::new(identity.id.as_str())?, profile)
            .await
            .inspect_err(|e| {
                warn!(
                    identity_id = %identity.id,
                    error = %e,
                    "Profile creation failed after sign-up"
                );
            })
    }

    pub async fn sign_in(&self, request: SignInRequest) -> Result<AuthSession, DomainError> {
        let email = request.email.trim();

        if email.is_empty() || request.password.is_empty() {
            return Err(DomainError::validation("Email and Password are required."));
        }

        let session = self.provider.sign_in(email, &request.password).await?;

        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found in database."))?;

        info!(user_id = %user.id(), "User signed in");
        Ok(AuthSession {
            access_token: session.access_token,
            expires_at: session.expires_at,
            user,
        })
    }
}
