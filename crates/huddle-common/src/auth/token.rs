//! Session token signing and verification
//!
//! Tokens are signed JWTs carrying the user id, email, and a random token id
//! so a fresh login after logout always yields a distinct token. Tokens do
//! not expire on their own; logout revokes them by clearing the store-side
//! active-token record, which the identity resolver checks after signature
//! verification.

use huddle_core::UserId;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user id)
    pub sub: String,
    /// Email at issue time
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Random token id, unique per issued token
    pub jti: String,
}

impl SessionClaims {
    /// Get the user id this token was issued to
    pub fn user_id(&self) -> Result<UserId, AppError> {
        self.sub
            .parse::<i64>()
            .map(UserId::new)
            .map_err(|_| AppError::InvalidToken)
    }
}

/// Signs and verifies session tokens
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    /// Create a new token service with the given signing secret
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a signed token for a user
    pub fn issue(&self, user_id: UserId, email: &str) -> Result<String, AppError> {
        let claims = SessionClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: chrono::Utc::now().timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to encode session token")))
    }

    /// Verify a token's signature and decode its claims
    ///
    /// # Errors
    /// Returns `AppError::InvalidToken` for malformed or tampered tokens.
    pub fn decode(&self, token: &str) -> Result<SessionClaims, AppError> {
        // Session tokens carry no exp claim; revocation is handled by the
        // store's active-token record.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::InvalidToken)
    }
}
