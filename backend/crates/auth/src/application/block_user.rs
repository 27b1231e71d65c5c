//! Block User Use Case

use std::sync::Arc;

use crate::domain::entity::identity::{Identity, IdentityChanges};
use crate::domain::policy::{Action, authorize};
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::user_id::UserId;
use crate::error::AuthResult;

/// Block user use case (admin only)
///
/// Only stops future logins; tokens already issued to the target remain
/// valid until they expire.
pub struct BlockUserUseCase<R>
where
    R: IdentityRepository,
{
    repo: Arc<R>,
}

impl<R> BlockUserUseCase<R>
where
    R: IdentityRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, actor: &Identity, target: UserId) -> AuthResult<()> {
        authorize(actor, Action::BlockIdentity { target })?;

        self.repo.update(target, &IdentityChanges::block()).await?;

        tracing::info!(actor_id = %actor.id, target_id = %target, "User blocked");

        Ok(())
    }
}
