//! Repository Traits
//!
//! Credential store contract. Implementations live in the infrastructure layer.

use crate::domain::entity::identity::{Identity, IdentityChanges, NewIdentity};
use crate::domain::value_object::{user_id::UserId, user_name::UserName};
use crate::error::AuthResult;

/// Identity (credential store) repository trait
#[trait_variant::make(IdentityRepository: Send)]
pub trait LocalIdentityRepository {
    /// Find identity by its unique user name
    async fn find_by_username(&self, username: &UserName) -> AuthResult<Option<Identity>>;

    /// Find identity by ID
    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<Identity>>;

    /// Check if user name exists
    async fn exists_by_username(&self, username: &UserName) -> AuthResult<bool>;

    /// Persist a new identity
    ///
    /// Must fail with `AuthError::UsernameTaken` atomically when the name is
    /// already present, even under concurrent inserts.
    async fn insert(&self, identity: &NewIdentity) -> AuthResult<Identity>;

    /// Apply all present fields in one transaction (all or nothing)
    ///
    /// Fails with `AuthError::UserNotFound` for an unknown ID and
    /// `AuthError::UsernameTaken` when renaming onto an existing name.
    async fn update(&self, id: UserId, changes: &IdentityChanges) -> AuthResult<()>;

    /// All identities ordered by ID
    async fn list(&self) -> AuthResult<Vec<Identity>>;
}
