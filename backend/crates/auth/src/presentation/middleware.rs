//! Auth Middleware
//!
//! Bearer authentication for protected routes.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use platform::bearer::extract_bearer_token;

use crate::application::ValidateTokenUseCase;
use crate::domain::entity::identity::Identity;
use crate::domain::repository::IdentityRepository;
use crate::error::AuthError;
use crate::presentation::handlers::AuthAppState;

/// The authenticated identity, stored in request extensions
#[derive(Debug, Clone)]
pub struct Actor(pub Identity);

/// Middleware that requires a valid bearer token
///
/// Rejects with 401 before the handler runs; on success the handler can
/// extract `Extension<Actor>`.
pub async fn require_bearer<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    let token = extract_bearer_token(req.headers())?;

    let use_case = ValidateTokenUseCase::new(state.repo.clone(), state.tokens.clone());
    let identity = use_case.execute(token).await?;

    tracing::debug!(user_id = %identity.id, "Bearer token accepted");

    req.extensions_mut().insert(Actor(identity));

    Ok(next.run(req).await)
}
