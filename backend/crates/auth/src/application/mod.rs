//! Application Layer
//!
//! Use cases and application services.

pub mod block_user;
pub mod config;
pub mod edit_user;
pub mod hashing;
pub mod list_users;
pub mod sign_in;
pub mod sign_up;
pub mod token_service;
pub mod validate_token;

// Re-exports
pub use block_user::BlockUserUseCase;
pub use config::AuthConfig;
pub use edit_user::{EditUserUseCase, UserUpdate};
pub use list_users::ListUsersUseCase;
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_up::{AdminProvision, SignUpInput, SignUpUseCase};
pub use token_service::{IssuedToken, TokenClaims, TokenError, TokenService};
pub use validate_token::ValidateTokenUseCase;
