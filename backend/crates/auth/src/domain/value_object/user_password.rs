//! User Password Value Object
//!
//! Domain wrappers over `platform::password`:
//! - [`RawPassword`] is the transient clear text of a credential attempt
//!   (never persisted, zeroized on drop)
//! - [`UserPassword`] is the Argon2id PHC string kept in the credential store

use platform::password::{ClearTextPassword, HashedPassword, PasswordHashError};
use std::fmt;

use crate::error::{AuthError, AuthResult};

// ============================================================================
// Raw Password (User Input)
// ============================================================================

pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Create a new raw password, enforcing the password policy
    ///
    /// ## Errors
    /// `AuthError::Validation` with a user-facing message
    pub fn new(raw: String) -> AuthResult<Self> {
        ClearTextPassword::new(raw)
            .map(Self)
            .map_err(|e| AuthError::Validation(e.to_string()))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash a raw password (CPU-heavy; call off the async executor)
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AuthResult<Self> {
        raw.inner()
            .hash(pepper)
            .map(Self)
            .map_err(|PasswordHashError::HashingFailed(msg)| {
                AuthError::Internal(format!("Password hashing failed: {}", msg))
            })
    }

    /// Restore from the credential store without parsing
    pub fn from_db(hash: String) -> Self {
        Self(HashedPassword::from_stored(hash))
    }

    /// PHC string for storage; never log it
    pub fn as_str(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Check a raw password; `false` on mismatch or a malformed stored hash
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.inner(), pepper)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserPassword").field(&"[HASH]").finish()
    }
}
