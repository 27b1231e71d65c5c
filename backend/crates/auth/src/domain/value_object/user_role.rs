//! User Role Value Object
//!
//! A free-form role label (`user`, `editor`, ...). Administrative privilege
//! is carried separately by `Identity::is_admin`, never by the label.

use derive_more::Display;
use thiserror::Error;

pub const USER_ROLE_MAX_LENGTH: usize = 32;

pub const DEFAULT_USER_ROLE: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserRoleError {
    #[error("Role cannot be empty")]
    Empty,

    #[error("Role must be at most 32 characters")]
    TooLong,

    #[error("Role may only contain a-z, 0-9, '_' and '-'")]
    InvalidCharacter,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{_0}")]
pub struct UserRole(String);

impl UserRole {
    /// Validate and canonicalize (ASCII lowercase) a role label
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserRoleError> {
        let code = raw.as_ref().trim().to_ascii_lowercase();

        if code.is_empty() {
            return Err(UserRoleError::Empty);
        }
        if code.len() > USER_ROLE_MAX_LENGTH {
            return Err(UserRoleError::TooLong);
        }
        if !code
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
        {
            return Err(UserRoleError::InvalidCharacter);
        }

        Ok(Self(code))
    }

    pub fn from_db(code: String) -> Self {
        Self(code)
    }

    #[inline]
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl Default for UserRole {
    fn default() -> Self {
        Self(DEFAULT_USER_ROLE.to_string())
    }
}
