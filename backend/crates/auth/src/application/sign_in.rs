//! Sign In Use Case
//!
//! Verifies a username/password pair and issues a bearer token.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::config::AuthConfig;
use crate::application::hashing::verify_password;
use crate::application::token_service::TokenService;
use crate::domain::entity::identity::Identity;
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::{user_name::UserName, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Token type reported to OAuth2 password-flow clients
pub const TOKEN_TYPE_BEARER: &str = "bearer";

/// Sign in input
pub struct SignInInput {
    pub username: String,
    pub password: String,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
}

/// Sign in use case
pub struct SignInUseCase<R>
where
    R: IdentityRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
    tokens: Arc<TokenService>,
}

impl<R> SignInUseCase<R>
where
    R: IdentityRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>, tokens: Arc<TokenService>) -> Self {
        Self {
            repo,
            config,
            tokens,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let identity = self.authenticate(&input.username, input.password).await?;

        if !identity.can_login() {
            return Err(AuthError::AccountBlocked);
        }

        let issued = self
            .tokens
            .issue(identity.username.as_str(), self.config.access_token_ttl)?;

        tracing::info!(
            user_id = %identity.id,
            username = %identity.username,
            expires_at = %issued.expires_at,
            "User signed in"
        );

        Ok(SignInOutput {
            access_token: issued.access_token,
            token_type: TOKEN_TYPE_BEARER,
            expires_at: issued.expires_at,
        })
    }

    /// Resolve credentials to an identity
    ///
    /// Returns `UnknownUser` or `InvalidCredentials`; both render the same
    /// response. Blocked status is not checked here.
    pub async fn authenticate(&self, username: &str, password: String) -> AuthResult<Identity> {
        // A name that could never have been registered is simply unknown
        let Ok(username) = UserName::new(username) else {
            return Err(AuthError::UnknownUser);
        };
        let Ok(password) = RawPassword::new(password) else {
            return Err(AuthError::InvalidCredentials);
        };

        let identity = self
            .repo
            .find_by_username(&username)
            .await?
            .ok_or(AuthError::UnknownUser)?;

        let valid = verify_password(
            password,
            identity.password_hash.clone(),
            self.config.password_pepper.clone(),
        )
        .await?;

        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(identity)
    }
}
