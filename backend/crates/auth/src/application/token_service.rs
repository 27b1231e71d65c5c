//! Token Service
//!
//! Issues and verifies stateless bearer tokens:
//!
//! ```text
//! base64url(json {sub, iat_ms, exp_ms}) "." base64url(HMAC-SHA256(secret, first segment))
//! ```
//!
//! No server-side record exists; a token is accepted iff the MAC matches the
//! process secret and `now <= exp_ms`.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use platform::crypto::{from_base64url, hmac_sha256, to_base64url, verify_hmac_sha256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::config::AuthConfig;
use crate::error::{AuthError, AuthResult};

/// Token verification failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token is malformed")]
    Malformed,

    #[error("Token signature is invalid")]
    BadSignature,

    #[error("Token has no subject")]
    MissingSubject,

    #[error("Token has expired")]
    Expired,
}

/// Verified token contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject user name
    #[serde(default)]
    pub sub: String,
    pub iat_ms: i64,
    pub exp_ms: i64,
}

/// A freshly signed token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies tokens with a single symmetric secret
///
/// Constructed from [`AuthConfig`] at startup; the secret never rotates
/// during the process lifetime.
#[derive(Clone)]
pub struct TokenService {
    secret: [u8; 32],
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            secret: config.token_secret,
        }
    }

    /// Issue a token for `subject` valid for `ttl` from now
    ///
    /// There is no default lifetime; every caller states it.
    pub fn issue(&self, subject: &str, ttl: Duration) -> AuthResult<IssuedToken> {
        self.issue_at(subject, ttl, Utc::now())
    }

    pub fn issue_at(
        &self,
        subject: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> AuthResult<IssuedToken> {
        let ttl = TimeDelta::from_std(ttl)
            .map_err(|e| AuthError::Internal(format!("Invalid token TTL: {e}")))?;
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::Internal("Token expiry out of range".to_string()))?;

        let claims = TokenClaims {
            sub: subject.to_string(),
            iat_ms: now.timestamp_millis(),
            exp_ms: expires_at.timestamp_millis(),
        };
        let payload = serde_json::to_vec(&claims)
            .map_err(|e| AuthError::Internal(format!("Token encoding failed: {e}")))?;

        let payload_b64 = to_base64url(&payload);
        let signature = hmac_sha256(&self.secret, payload_b64.as_bytes());

        Ok(IssuedToken {
            access_token: format!("{}.{}", payload_b64, to_base64url(&signature)),
            expires_at,
        })
    }

    /// Verify signature and expiry
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError> {
        let (payload_b64, signature_b64) = token.split_once('.').ok_or(TokenError::Malformed)?;

        let signature = from_base64url(signature_b64).map_err(|_| TokenError::Malformed)?;
        if !verify_hmac_sha256(&self.secret, payload_b64.as_bytes(), &signature) {
            return Err(TokenError::BadSignature);
        }

        // Only signed bytes are parsed from here on
        let payload = from_base64url(payload_b64).map_err(|_| TokenError::Malformed)?;
        let claims: TokenClaims =
            serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;

        if claims.sub.is_empty() {
            return Err(TokenError::MissingSubject);
        }

        if now.timestamp_millis() > claims.exp_ms {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
