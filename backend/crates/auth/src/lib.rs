//! Auth (Authentication & Authorization) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, authorization policy, repository trait
//! - `application/` - Use cases, token service, configuration
//! - `infra/` - Credential store implementations (PostgreSQL, in-memory)
//! - `presentation/` - HTTP handlers, DTOs, router, bearer middleware
//!
//! ## Features
//! - Registration and username + password login (OAuth2 password form)
//! - Stateless HMAC-signed bearer tokens with an explicit lifetime
//! - Admin-only listing and blocking, self-or-admin partial updates
//!
//! ## Security Model
//! - Passwords hashed with Argon2id off the async executor
//! - Unknown user and wrong password produce the same response
//! - Missing or invalid credentials are 401, insufficient privilege is 403
//! - No server-side sessions: blocking stops new logins, issued tokens live
//!   until they expire

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::{AdminProvision, SignUpInput, SignUpUseCase};
pub use error::{AuthError, AuthResult};
pub use infra::{InMemoryIdentityRepository, PgIdentityRepository};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod store {
    pub use crate::domain::repository::IdentityRepository;
    pub use crate::infra::*;
}
