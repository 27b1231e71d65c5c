//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::application::config::AuthConfig;
use crate::domain::repository::IdentityRepository;
use crate::infra::postgres::PgIdentityRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_bearer;

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgIdentityRepository, config: AuthConfig) -> Router {
    auth_router_generic(repo, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
{
    let state = AuthAppState::new(repo, config);

    let protected = Router::new()
        .route("/users", get(handlers::list_users::<R>))
        .route("/users/{id}", put(handlers::update_user::<R>))
        .route("/users/{id}/block", put(handlers::block_user::<R>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer::<R>,
        ));

    Router::new()
        .route("/token", post(handlers::login::<R>))
        .route("/register", post(handlers::register::<R>))
        .route("/health", get(handlers::health))
        .merge(protected)
        .with_state(state)
}
