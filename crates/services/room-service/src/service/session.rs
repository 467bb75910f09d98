//! Bearer-token verification against the identity provider's signing secret.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::AppResult;

/// Claims this service relies on. Roles are never taken from the token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: i64,
}

/// Authenticated caller identity.
#[derive(Debug, Clone)]
pub struct Session {
    pub subject: Uuid,
    pub email: Option<String>,
}

impl From<Claims> for Session {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            email: claims.email,
        }
    }
}

/// Session verifier trait for dependency injection.
pub trait SessionVerifier: Send + Sync {
    /// Verify a bearer token and return the caller identity
    fn verify(&self, token: &str) -> AppResult<Session>;
}

/// HS256 verifier using a shared secret.
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }
}

impl SessionVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> AppResult<Session> {
        let data = decode::<Claims>(token, &self.key, &self.validation)?;
        Ok(data.claims.into())
    }
}
