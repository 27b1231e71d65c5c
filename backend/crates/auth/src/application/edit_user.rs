//! Edit User Use Case
//!
//! Partial update of an identity by its owner or an administrator.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::hashing::hash_password;
use crate::domain::entity::identity::{Identity, IdentityChanges};
use crate::domain::policy::{Action, authorize};
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::{
    user_id::UserId, user_name::UserName, user_password::RawPassword, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// Requested changes; `None` means the field was absent
#[derive(Debug, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub is_blocked: Option<bool>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.password.is_none()
            && self.role.is_none()
            && self.is_blocked.is_none()
    }
}

/// Edit user use case
pub struct EditUserUseCase<R>
where
    R: IdentityRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> EditUserUseCase<R>
where
    R: IdentityRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    /// Apply every present field of `update` to `target` in one write
    ///
    /// Checks run in order: privilege, emptiness, field validation. The
    /// password is hashed last so rejected requests cost nothing. Writing
    /// `is_blocked` additionally needs the block privilege, even on self.
    pub async fn execute(
        &self,
        actor: &Identity,
        target: UserId,
        update: UserUpdate,
    ) -> AuthResult<()> {
        authorize(actor, Action::EditIdentity { target })?;
        if update.is_blocked.is_some() {
            authorize(actor, Action::BlockIdentity { target })?;
        }

        if update.is_empty() {
            return Err(AuthError::NoFields);
        }

        let username = update
            .username
            .map(UserName::new)
            .transpose()
            .map_err(|e| AuthError::Validation(e.to_string()))?;
        let role = update
            .role
            .map(UserRole::new)
            .transpose()
            .map_err(|e| AuthError::Validation(e.to_string()))?;
        let password = update.password.map(RawPassword::new).transpose()?;

        let password_hash = match password {
            Some(password) => {
                Some(hash_password(password, self.config.password_pepper.clone()).await?)
            }
            None => None,
        };

        let changes = IdentityChanges {
            username,
            password_hash,
            role,
            is_blocked: update.is_blocked,
        };

        self.repo.update(target, &changes).await?;

        tracing::info!(
            actor_id = %actor.id,
            target_id = %target,
            fields = ?changes.changed_fields(),
            "User updated"
        );

        Ok(())
    }
}
