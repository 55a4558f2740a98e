//! Session tokens signed with a shared secret (HS256)

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::{DomainError, Identity};

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (identity ID)
    pub sub: String,
    pub email: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl JwtClaims {
    pub fn new(identity: &Identity, expiration_hours: u64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours as i64);

        Self {
            sub: identity.id.clone(),
            email: identity.email.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

/// Configuration for JWT service
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token expiration time in hours
    pub expiration_hours: u64,
}

impl Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[hidden]")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, expiration_hours: u64) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours,
        }
    }
}

/// Issues and validates session tokens
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("config", &self.config)
            .finish()
    }
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Sign a token for an identity, returning it with its claims
    pub fn issue(&self, identity: &Identity) -> Result<(String, JwtClaims), DomainError> {
        let claims = JwtClaims::new(identity, self.config.expiration_hours);

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to generate JWT: {}", e)))?;

        Ok((token, claims))
    }

    pub fn validate(&self, token: &str) -> Result<JwtClaims, DomainError> {
        decode::<JwtClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| DomainError::identity(format!("Invalid session token: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity {
            id: "id-1".to_string(),
            email: "ann@example.com".to_string(),
        }
    }

    #[test]
    fn test_issue_and_validate() {
        let service = JwtService::new(JwtConfig::new("test-secret", 2));
        let (token, claims) = service.issue(&identity()).unwrap();

        let decoded = service.validate(&token).unwrap();
        assert_eq!(decoded.sub, "id-1");
        assert_eq!(decoded.email, "ann@example.com");
        assert_eq!(claims.exp - claims.iat, 2 * 3600);
        assert!(claims.expires_at().unwrap() > Utc::now());
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let issuer = JwtService::new(JwtConfig::new("secret-a", 1));
        let verifier = JwtService::new(JwtConfig::new("secret-b", 1));
        let (token, _) = issuer.issue(&identity()).unwrap();

        let err = verifier.validate(&token).unwrap_err();
        assert!(matches!(err, DomainError::Identity { .. }));
    }

    #[test]
    fn test_debug_hides_secret() {
        let service = JwtService::new(JwtConfig::new("super-secret", 1));
        assert!(!format!("{:?}", service).contains("super-secret"));
    }
}
