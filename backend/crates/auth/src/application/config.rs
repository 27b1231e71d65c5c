//! Application Configuration
//!
//! Configuration for the Auth application layer. Built once at startup and
//! shared by reference; nothing here is read from ambient globals.

use std::fmt;
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use thiserror::Error;

/// Login token lifetime used when the operator does not configure one
pub const DEFAULT_ACCESS_TOKEN_TTL: Duration = Duration::from_secs(30 * 60);

/// Rejected token lifetime
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TtlError {
    #[error("token lifetime must be greater than zero")]
    Zero,
    #[error("token lifetime of {0} minutes is out of range")]
    OutOfRange(u64),
}

/// Convert an operator-supplied lifetime in minutes
///
/// The result is guaranteed to produce a representable expiry when a token
/// is issued now.
pub fn access_token_ttl_from_minutes(minutes: u64) -> Result<Duration, TtlError> {
    if minutes == 0 {
        return Err(TtlError::Zero);
    }
    let seconds = minutes
        .checked_mul(60)
        .ok_or(TtlError::OutOfRange(minutes))?;
    let ttl = Duration::from_secs(seconds);

    TimeDelta::from_std(ttl)
        .ok()
        .and_then(|delta| Utc::now().checked_add_signed(delta))
        .ok_or(TtlError::OutOfRange(minutes))?;

    Ok(ttl)
}

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// Symmetric key for HMAC-SHA256 token signatures (32 bytes)
    pub token_secret: [u8; 32],
    /// Lifetime of tokens issued by the login endpoint
    pub access_token_ttl: Duration,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: [0u8; 32],
            access_token_ttl: DEFAULT_ACCESS_TOKEN_TTL,
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    /// Create config with a random token secret (for development)
    ///
    /// Tokens do not survive a restart with this config.
    pub fn with_random_secret() -> Self {
        Self {
            token_secret: platform::crypto::random_key(),
            ..Default::default()
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"[REDACTED]")
            .field("access_token_ttl", &self.access_token_ttl)
            .field(
                "password_pepper",
                &self.password_pepper.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_secrets_differ() {
        let a = AuthConfig::with_random_secret();
        let b = AuthConfig::with_random_secret();
        assert_ne!(a.token_secret, b.token_secret);
        assert_eq!(a.access_token_ttl, DEFAULT_ACCESS_TOKEN_TTL);
    }

    #[test]
    fn test_ttl_from_minutes() {
        assert_eq!(
            access_token_ttl_from_minutes(30),
            Ok(Duration::from_secs(30 * 60))
        );
        assert_eq!(access_token_ttl_from_minutes(0), Err(TtlError::Zero));
    }

    #[test]
    fn test_ttl_out_of_range() {
        // Overflows u64 seconds
        assert_eq!(
            access_token_ttl_from_minutes(u64::MAX),
            Err(TtlError::OutOfRange(u64::MAX))
        );
        // Fits in u64 but not in a chrono TimeDelta
        let huge = u64::MAX / 60;
        assert_eq!(
            access_token_ttl_from_minutes(huge),
            Err(TtlError::OutOfRange(huge))
        );
        // Fits in a TimeDelta but the expiry passes the last representable date
        let past_calendar = 146_666_666_667;
        assert_eq!(
            access_token_ttl_from_minutes(past_calendar),
            Err(TtlError::OutOfRange(past_calendar))
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = AuthConfig {
            password_pepper: Some(b"pepper".to_vec()),
            ..AuthConfig::with_random_secret()
        };
        let debug = format!("{:?}", config);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("token_secret: ["));
        assert!(!debug.contains("112, 101"));
    }
}
