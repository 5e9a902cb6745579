//! HMAC-signed session tokens.
//!
//! A token is `base64url(payload) "." base64url(signature)` where the payload is
//! the JSON object `{"value": <user id>, "exp": <unix seconds>}` and the
//! signature is HMAC-SHA256 of the encoded payload under the server secret.

use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const DEFAULT_TOKEN_LIFETIME_DAYS: i64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session secret must not be empty")]
    EmptySecret,
    #[error("session lifetime must be positive, got {0} day(s)")]
    InvalidLifetime(i64),
    #[error("failed to encode session payload: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("invalid signing key")]
    InvalidKey,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    value: String,
    exp: i64,
}

/// Issues and validates session tokens with a shared secret.
#[derive(Clone)]
pub struct SessionTokens {
    secret: Vec<u8>,
    lifetime: Duration,
}

impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokens")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl SessionTokens {
    pub fn new(secret: impl Into<Vec<u8>>, lifetime_days: i64) -> Result<Self, SessionError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(SessionError::EmptySecret);
        }
        if lifetime_days <= 0 {
            return Err(SessionError::InvalidLifetime(lifetime_days));
        }
        Ok(Self {
            secret,
            lifetime: Duration::days(lifetime_days),
        })
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a token for `value` that expires one lifetime from now.
    pub fn issue(&self, value: &str) -> Result<String, SessionError> {
        self.issue_at(value, Utc::now())
    }

    pub fn issue_at(&self, value: &str, issued_at: DateTime<Utc>) -> Result<String, SessionError> {
        let claims = Claims {
            value: value.to_string(),
            exp: (issued_at + self.lifetime).timestamp(),
        };
        let payload = B64.encode(serde_json::to_vec(&claims)?);
        let signature = B64.encode(self.sign(payload.as_bytes())?);
        Ok(format!("{}.{}", payload, signature))
    }

    /// The value stored in `token`, or `None` when it is malformed, forged or expired.
    pub fn validate(&self, token: &str) -> Option<String> {
        self.validate_at(token, Utc::now())
    }

    pub fn validate_at(&self, token: &str, at: DateTime<Utc>) -> Option<String> {
        let (payload, signature) = token.split_once('.')?;
        let signature = B64.decode(signature).ok()?;

        let mut mac = HmacSha256::new_from_slice(&self.secret).ok()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature).ok()?;

        let claims: Claims = serde_json::from_slice(&B64.decode(payload).ok()?).ok()?;
        if claims.exp <= at.timestamp() {
            log::debug!("Rejected expired session token");
            return None;
        }
        Some(claims.value)
    }

    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, SessionError> {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).map_err(|_| SessionError::InvalidKey)?;
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}
