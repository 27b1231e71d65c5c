//! Sign Up Use Case
//!
//! Registers a new identity, and provisions the operator's administrator.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::hashing::hash_password;
use crate::domain::entity::identity::{Identity, NewIdentity};
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::{
    user_name::UserName, user_password::RawPassword, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub username: String,
    pub password: String,
    /// Role label; `None` means the default role
    pub role: Option<String>,
}

/// Outcome of [`SignUpUseCase::provision_admin`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminProvision {
    Created,
    AlreadyAdmin,
    /// The name exists but the identity has no admin privilege
    NameHeldByNonAdmin,
}

/// Sign up use case
pub struct SignUpUseCase<R>
where
    R: IdentityRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> SignUpUseCase<R>
where
    R: IdentityRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<Identity> {
        let username =
            UserName::new(input.username).map_err(|e| AuthError::Validation(e.to_string()))?;
        let role = match input.role {
            Some(role) => UserRole::new(role).map_err(|e| AuthError::Validation(e.to_string()))?,
            None => UserRole::default(),
        };
        let password = RawPassword::new(input.password)?;

        // Skip the expensive hash for the common duplicate case; the insert
        // below still enforces uniqueness atomically.
        if self.repo.exists_by_username(&username).await? {
            return Err(AuthError::UsernameTaken);
        }

        let password_hash = hash_password(password, self.config.password_pepper.clone()).await?;

        let identity = self
            .repo
            .insert(&NewIdentity::new(username, password_hash, role))
            .await?;

        tracing::info!(
            user_id = %identity.id,
            username = %identity.username,
            role = %identity.role,
            "User registered"
        );

        Ok(identity)
    }

    /// Create the administrator account if it does not exist yet
    ///
    /// An existing identity with the same name is left untouched, even when it
    /// is not an administrator.
    pub async fn provision_admin(
        &self,
        username: String,
        password: String,
    ) -> AuthResult<AdminProvision> {
        let username =
            UserName::new(username).map_err(|e| AuthError::Validation(e.to_string()))?;
        let password = RawPassword::new(password)?;

        if let Some(existing) = self.repo.find_by_username(&username).await? {
            return Ok(Self::classify_existing(&existing));
        }

        let password_hash = hash_password(password, self.config.password_pepper.clone()).await?;

        match self
            .repo
            .insert(&NewIdentity::admin(username.clone(), password_hash))
            .await
        {
            Ok(identity) => {
                tracing::info!(
                    user_id = %identity.id,
                    username = %identity.username,
                    "Admin account provisioned"
                );
                Ok(AdminProvision::Created)
            }
            // Someone else wrote the name between the lookup and the insert
            Err(AuthError::UsernameTaken) => match self.repo.find_by_username(&username).await? {
                Some(existing) => Ok(Self::classify_existing(&existing)),
                None => Err(AuthError::UsernameTaken),
            },
            Err(e) => Err(e),
        }
    }

    fn classify_existing(existing: &Identity) -> AdminProvision {
        if existing.is_admin {
            tracing::debug!(username = %existing.username, "Admin account already present");
            AdminProvision::AlreadyAdmin
        } else {
            tracing::warn!(
                user_id = %existing.id,
                username = %existing.username,
                "Admin name is held by a non-admin identity, no admin provisioned"
            );
            AdminProvision::NameHeldByNonAdmin
        }
    }
}
