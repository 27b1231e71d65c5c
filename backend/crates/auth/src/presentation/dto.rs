//! API DTOs (Data Transfer Objects)
//!
//! Field names are snake_case on the wire to match OAuth2 password-flow
//! clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::identity::Identity;

// ============================================================================
// Token
// ============================================================================

/// `application/x-www-form-urlencoded` login body
///
/// Extra OAuth2 fields (`grant_type`, `scope`, ...) are accepted and ignored.
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
}

// ============================================================================
// Register
// ============================================================================

/// Register request
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

// ============================================================================
// Users
// ============================================================================

/// Partial update body; absent keys stay `None`
///
/// `null` is treated like an absent key.
#[derive(Default, Deserialize)]
pub struct UserUpdateRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_blocked: Option<bool>,
}

/// One row of the user listing
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub is_blocked: bool,
}

impl From<Identity> for UserSummary {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.id.get(),
            username: identity.username.to_string(),
            is_blocked: identity.is_blocked,
        }
    }
}

/// User listing response
#[derive(Debug, Clone, Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserSummary>,
}

// ============================================================================
// Common
// ============================================================================

/// Generic success body
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Health check body
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
