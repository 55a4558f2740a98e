//! Identity provider backed by the hosted backend's auth API

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::{DomainError, Identity, IdentityProvider, Session};
use crate::infrastructure::storage::HostedConfig;

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

/// Sign-up replies either wrap the user or are the user itself
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Wrapped { user: AuthUser },
    Bare(AuthUser),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: AuthUser,
}

impl TokenResponse {
    fn expiry(&self) -> Option<DateTime<Utc>> {
        match (self.expires_at, self.expires_in) {
            (Some(at), _) => Utc.timestamp_opt(at, 0).single(),
            (None, Some(secs)) => Some(Utc::now() + Duration::seconds(secs)),
            (None, None) => None,
        }
    }
}

/// Auth API error body; the message field varies by endpoint
#[derive(Debug, Default, Deserialize)]
struct AuthApiError {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl AuthApiError {
    fn into_message(self) -> Option<String> {
        self.msg.or(self.error_description).or(self.message)
    }
}

fn to_identity(user: AuthUser, fallback_email: &str) -> Identity {
    Identity {
        id: user.id,
        email: user.email.unwrap_or_else(|| fallback_email.to_string()),
    }
}

/// Delegates sign-up and sign-in to the hosted auth endpoints
#[derive(Debug, Clone)]
pub struct HostedIdentityProvider {
    client: Client,
    config: HostedConfig,
}

impl HostedIdentityProvider {
    pub fn new(client: Client, config: HostedConfig) -> Self {
        Self { client, config }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        action: &str,
    ) -> Result<T, DomainError> {
        let response = self
            .config
            .authorize(builder)
            .send()
            .await
            .map_err(|e| DomainError::identity(format!("Failed to {}: {}", action, e)))?;

        let status = response.status();

        if status.is_success() {
            return response.json::<T>().await.map_err(|e| {
                DomainError::identity(format!("Failed to decode {} response: {}", action, e))
            });
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<AuthApiError>(&body)
            .unwrap_or_default()
            .into_message()
            .unwrap_or(body);

        debug!(status = %status, action, "Auth API request failed");
        Err(DomainError::identity(message))
    }
}

#[async_trait]
impl IdentityProvider for HostedIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, DomainError> {
        let builder = self
            .client
            .post(self.config.endpoint("auth/v1/signup"))
            .json(&json!({ "email": email, "password": password }));

        let user = match self.send::<SignUpResponse>(builder, "sign up").await? {
            SignUpResponse::Wrapped { user } | SignUpResponse::Bare(user) => user,
        };

        let identity = to_identity(user, email);
        info!(identity_id = %identity.id, "Registered hosted identity");
        Ok(identity)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, DomainError> {
        let builder = self
            .client
            .post(self.config.endpoint("auth/v1/token"))
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));

        let token: TokenResponse = self.send(builder, "sign in").await?;
        let expires_at = token.expiry();

        Ok(Session {
            access_token: token.access_token,
            expires_at,
            identity: to_identity(token.user, email),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> HostedIdentityProvider {
        HostedIdentityProvider::new(Client::new(), HostedConfig::new(server.uri(), "anon-key"))
    }

    #[tokio::test]
    async fn test_sign_up_reads_wrapped_user() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .and(header("apikey", "anon-key"))
            .and(body_json(json!({"email": "ann@example.com", "password": "hunter22"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": {"id": "auth-1", "email": "ann@example.com"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let identity = provider(&server).sign_up("ann@example.com", "hunter22").await.unwrap();
        assert_eq!(identity.id, "auth-1");
        assert_eq!(identity.email, "ann@example.com");
    }

    #[tokio::test]
    async fn test_sign_up_reads_bare_user() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "auth-2"})))
            .mount(&server)
            .await;

        let identity = provider(&server).sign_up("bob@example.com", "hunter22").await.unwrap();
        assert_eq!(identity.id, "auth-2");
        assert_eq!(identity.email, "bob@example.com");
    }

    #[tokio::test]
    async fn test_sign_up_error_message_is_surfaced() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "code": 422,
                "msg": "User already registered"
            })))
            .mount(&server)
            .await;

        let err = provider(&server).sign_up("ann@example.com", "hunter22").await.unwrap_err();
        assert!(matches!(err, DomainError::Identity { .. }));
        assert_eq!(err.message(), "User already registered");
    }

    #[tokio::test]
    async fn test_sign_in_returns_session() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "password"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "jwt-token",
                "expires_at": 1_900_000_000,
                "user": {"id": "auth-1", "email": "ann@example.com"}
            })))
            .mount(&server)
            .await;

        let session = provider(&server).sign_in("ann@example.com", "hunter22").await.unwrap();
        assert_eq!(session.access_token, "jwt-token");
        assert_eq!(session.identity.id, "auth-1");
        assert_eq!(session.expires_at.unwrap().timestamp(), 1_900_000_000);
    }

    #[tokio::test]
    async fn test_sign_in_rejection_uses_error_description() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials"
            })))
            .mount(&server)
            .await;

        let err = provider(&server).sign_in("ann@example.com", "bad").await.unwrap_err();
        assert_eq!(err.message(), "Invalid login credentials");
    }
}
