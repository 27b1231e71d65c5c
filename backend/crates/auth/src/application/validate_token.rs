//! Validate Token Use Case
//!
//! Turns a bearer token into the acting identity.

use std::sync::Arc;

use crate::application::token_service::TokenService;
use crate::domain::entity::identity::Identity;
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::user_name::UserName;
use crate::error::{AuthError, AuthResult};

/// Validate token use case
pub struct ValidateTokenUseCase<R>
where
    R: IdentityRepository,
{
    repo: Arc<R>,
    tokens: Arc<TokenService>,
}

impl<R> ValidateTokenUseCase<R>
where
    R: IdentityRepository,
{
    pub fn new(repo: Arc<R>, tokens: Arc<TokenService>) -> Self {
        Self { repo, tokens }
    }

    /// Verify `token` and load its subject
    ///
    /// ## Errors
    /// - `InvalidToken` for a bad signature, malformed token or empty subject
    /// - `TokenExpired` once the expiry has passed
    /// - `UnknownSubject` if the subject no longer exists
    pub async fn execute(&self, token: &str) -> AuthResult<Identity> {
        let claims = self.tokens.verify(token)?;

        // Names are only ever signed after passing validation
        let username = UserName::new(claims.sub).map_err(|_| AuthError::InvalidToken)?;

        self.repo
            .find_by_username(&username)
            .await?
            .ok_or(AuthError::UnknownSubject)
    }
}
