//! List Users Use Case

use std::sync::Arc;

use crate::domain::entity::identity::Identity;
use crate::domain::policy::{Action, authorize};
use crate::domain::repository::IdentityRepository;
use crate::error::AuthResult;

/// List users use case (admin only)
pub struct ListUsersUseCase<R>
where
    R: IdentityRepository,
{
    repo: Arc<R>,
}

impl<R> ListUsersUseCase<R>
where
    R: IdentityRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, actor: &Identity) -> AuthResult<Vec<Identity>> {
        authorize(actor, Action::ListIdentities)?;
        self.repo.list().await
    }
}
