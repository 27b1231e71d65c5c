//! HTTP Handlers

use axum::extract::{Path, State};
use axum::{Extension, Form, Json};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    BlockUserUseCase, EditUserUseCase, ListUsersUseCase, SignInInput, SignInUseCase, SignUpInput,
    SignUpUseCase, TokenService, UserUpdate,
};
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::user_id::UserId;
use crate::error::AuthResult;
use crate::presentation::dto::{
    HealthResponse, LoginForm, MessageResponse, RegisterRequest, TokenResponse,
    UserUpdateRequest, UsersResponse,
};
use crate::presentation::middleware::Actor;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub tokens: Arc<TokenService>,
}

impl<R> AuthAppState<R>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: R, config: AuthConfig) -> Self {
        let tokens = TokenService::new(&config);
        Self {
            repo: Arc::new(repo),
            config: Arc::new(config),
            tokens: Arc::new(tokens),
        }
    }
}

// ============================================================================
// Token
// ============================================================================

/// POST /token
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Form(form): Form<LoginForm>,
) -> AuthResult<Json<TokenResponse>>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.config.clone(),
        state.tokens.clone(),
    );

    let output = use_case
        .execute(SignInInput {
            username: form.username,
            password: form.password,
        })
        .await?;

    Ok(Json(TokenResponse {
        access_token: output.access_token,
        token_type: output.token_type,
        expires_at: output.expires_at,
    }))
}

// ============================================================================
// Register
// ============================================================================

/// POST /register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(state.repo.clone(), state.config.clone());

    use_case
        .execute(SignUpInput {
            username: req.username,
            password: req.password,
            role: req.role,
        })
        .await?;

    Ok(Json(MessageResponse {
        message: "User registered successfully",
    }))
}

// ============================================================================
// Users (bearer required)
// ============================================================================

/// GET /users
pub async fn list_users<R>(
    State(state): State<AuthAppState<R>>,
    Extension(Actor(actor)): Extension<Actor>,
) -> AuthResult<Json<UsersResponse>>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    let use_case = ListUsersUseCase::new(state.repo.clone());
    let identities = use_case.execute(&actor).await?;

    Ok(Json(UsersResponse {
        users: identities.into_iter().map(Into::into).collect(),
    }))
}

/// PUT /users/{id}
pub async fn update_user<R>(
    State(state): State<AuthAppState<R>>,
    Extension(Actor(actor)): Extension<Actor>,
    Path(id): Path<i64>,
    Json(req): Json<UserUpdateRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    let use_case = EditUserUseCase::new(state.repo.clone(), state.config.clone());

    let update = UserUpdate {
        username: req.username,
        password: req.password,
        role: req.role,
        is_blocked: req.is_blocked,
    };
    use_case.execute(&actor, UserId::new(id), update).await?;

    Ok(Json(MessageResponse {
        message: "User updated successfully",
    }))
}

/// PUT /users/{id}/block
pub async fn block_user<R>(
    State(state): State<AuthAppState<R>>,
    Extension(Actor(actor)): Extension<Actor>,
    Path(id): Path<i64>,
) -> AuthResult<Json<MessageResponse>>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    let use_case = BlockUserUseCase::new(state.repo.clone());
    use_case.execute(&actor, UserId::new(id)).await?;

    Ok(Json(MessageResponse {
        message: "User blocked successfully",
    }))
}

// ============================================================================
// Health
// ============================================================================

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
