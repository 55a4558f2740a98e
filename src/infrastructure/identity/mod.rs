//! Identity providers and credential primitives

mod hosted;
mod jwt;
mod local;
mod password;

pub use hosted::HostedIdentityProvider;
pub use jwt::{JwtClaims, JwtConfig, JwtService};
pub use local::{Credential, CredentialEmail, LocalIdentityProvider};
pub use password::{validate_password, Argon2Hasher, PasswordHasher, MIN_PASSWORD_LENGTH};
