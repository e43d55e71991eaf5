use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;

/// Token payload; the organisational ids let handlers scope queries without a lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub id_role: Uuid,
    pub id_bidang: Option<Uuid>,
    pub id_cabang: Option<Uuid>,
    pub id_pegawai: Option<Uuid>,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),
    #[error("Invalid JWT secret")]
    InvalidSecret,
}

/// HS256 signing and verification with the configured secret
#[derive(Clone)]
pub struct JwtKeys {
    secret: String,
    expiry_hours: u64,
}

impl JwtKeys {
    pub fn new(secret: impl Into<String>, expiry_hours: u64) -> Self {
        Self { secret: secret.into(), expiry_hours }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(security.jwt_secret.clone(), security.jwt_expiry_hours)
    }

    pub fn expires_in_seconds(&self) -> i64 {
        (self.expiry_hours * 3600) as i64
    }

    /// Stamp `iat`/`exp` on the claims and sign them
    pub fn issue(&self, mut claims: Claims) -> Result<(String, Claims), JwtError> {
        if self.secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }
        let now = Utc::now();
        claims.iat = now.timestamp();
        claims.exp = (now + Duration::hours(self.expiry_hours as i64)).timestamp();

        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(self.secret.as_bytes()))
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))?;
        Ok((token, claims))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        if self.secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }
        let data = decode::<Claims>(token, &DecodingKey::from_secret(self.secret.as_bytes()), &Validation::default())
            .map_err(|e| JwtError::InvalidToken(e.to_string()))?;
        Ok(data.claims)
    }
}

pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, cost)
}

/// Constant-time comparison happens inside `bcrypt::verify`; a malformed hash counts as a mismatch
pub fn verify_password(password: &str, hash: &str) -> bool {
    match bcrypt::verify(password, hash) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!("Stored password hash could not be verified: {}", e);
            false
        }
    }
}
