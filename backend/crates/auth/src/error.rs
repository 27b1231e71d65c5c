//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::conversions::{STORE_UNAVAILABLE, is_store_unavailable};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::application::token_service::TokenError;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// The single public message for every failed login, so responses never
/// reveal whether the user name exists.
pub const LOGIN_FAILED_MESSAGE: &str = "Incorrect username or password";

const UNAUTHENTICATED_MESSAGE: &str = "Invalid authentication credentials";

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Login named a user that does not exist
    #[error("Unknown user name")]
    UnknownUser,

    /// Login password did not match
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Correct credentials for a blocked identity
    #[error("Account is blocked")]
    AccountBlocked,

    /// User name already exists
    #[error("Username already exists")]
    UsernameTaken,

    /// No bearer credential on a protected request
    #[error("Missing bearer token")]
    MissingToken,

    /// Bad signature, malformed token, or no subject
    #[error("Invalid token")]
    InvalidToken,

    /// Signature valid but expiry has passed
    #[error("Token expired")]
    TokenExpired,

    /// Token subject no longer resolves to an identity
    #[error("Token subject does not exist")]
    UnknownSubject,

    /// Authenticated actor lacks the privilege
    #[error("{0}")]
    Forbidden(&'static str),

    /// Update request carried no recognized field
    #[error("No valid fields provided for update")]
    NoFields,

    /// Target of an edit/block does not exist
    #[error("User not found")]
    UserNotFound,

    /// Malformed user name, role or password
    #[error("{0}")]
    Validation(String),

    /// Credential store failure
    #[error("Database error: {0}")]
    Store(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::UnknownUser
            | AuthError::InvalidCredentials
            | AuthError::UsernameTaken
            | AuthError::NoFields
            | AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::TokenExpired
            | AuthError::UnknownSubject => ErrorKind::Unauthorized,
            AuthError::AccountBlocked | AuthError::Forbidden(_) => ErrorKind::Forbidden,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::Store(e) if is_store_unavailable(e) => ErrorKind::ServiceUnavailable,
            AuthError::Store(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::UnknownUser | AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::AccountBlocked => "ACCOUNT_BLOCKED",
            AuthError::UsernameTaken => "USERNAME_TAKEN",
            AuthError::MissingToken | AuthError::InvalidToken | AuthError::UnknownSubject => {
                "INVALID_TOKEN"
            }
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::Forbidden(_) => "FORBIDDEN",
            AuthError::NoFields => "NO_FIELDS",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::Validation(_) => "VALIDATION_FAILED",
            AuthError::Store(e) if is_store_unavailable(e) => STORE_UNAVAILABLE,
            AuthError::Store(_) | AuthError::Internal(_) => "INTERNAL",
        }
    }

    /// Message safe to show to the caller
    fn public_message(&self) -> String {
        match self {
            AuthError::UnknownUser | AuthError::InvalidCredentials => {
                LOGIN_FAILED_MESSAGE.to_string()
            }
            AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::TokenExpired
            | AuthError::UnknownSubject => UNAUTHENTICATED_MESSAGE.to_string(),
            AuthError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    /// Convert to AppError
    pub fn into_app_error(self) -> AppError {
        match self {
            // Never leak driver details to the caller
            AuthError::Store(e) if is_store_unavailable(&e) => AppError::from(e),
            AuthError::Store(_) => AppError::internal("Internal server error").with_code("INTERNAL"),
            other => AppError::new(other.kind(), other.public_message()).with_code(other.code()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Store(e) => {
                tracing::error!(error = %e, "Auth store error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::UnknownUser | AuthError::InvalidCredentials => {
                tracing::warn!(reason = %self, "Invalid login attempt");
            }
            AuthError::AccountBlocked => {
                tracing::warn!("Login attempt on blocked account");
            }
            AuthError::Forbidden(_) => {
                tracing::warn!(error = %self, "Forbidden request");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AuthError::TokenExpired,
            TokenError::Malformed | TokenError::BadSignature | TokenError::MissingSubject => {
                AuthError::InvalidToken
            }
        }
    }
}

impl From<platform::bearer::BearerError> for AuthError {
    fn from(err: platform::bearer::BearerError) -> Self {
        match err {
            platform::bearer::BearerError::Missing => AuthError::MissingToken,
            platform::bearer::BearerError::Malformed => AuthError::InvalidToken,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_failures_are_indistinguishable() {
        let unknown = AuthError::UnknownUser.into_app_error();
        let wrong = AuthError::InvalidCredentials.into_app_error();

        assert_eq!(unknown.kind(), wrong.kind());
        assert_eq!(unknown.code(), wrong.code());
        assert_eq!(unknown.message(), wrong.message());
        assert_eq!(unknown.status_code(), 400);
        assert_eq!(unknown.message(), LOGIN_FAILED_MESSAGE);
    }

    #[test]
    fn test_unauthenticated_vs_forbidden() {
        for err in [
            AuthError::MissingToken,
            AuthError::InvalidToken,
            AuthError::TokenExpired,
            AuthError::UnknownSubject,
        ] {
            assert_eq!(err.into_app_error().status_code(), 401);
        }
        let forbidden = AuthError::Forbidden("Not authorized to perform this action");
        assert_eq!(forbidden.into_app_error().status_code(), 403);
    }

    #[test]
    fn test_wire_status_codes() {
        assert_eq!(AuthError::UsernameTaken.into_app_error().status_code(), 400);
        assert_eq!(AuthError::NoFields.into_app_error().status_code(), 400);
        assert_eq!(AuthError::NoFields.into_app_error().code(), "NO_FIELDS");
        assert_eq!(AuthError::UserNotFound.into_app_error().status_code(), 404);
        assert_eq!(AuthError::AccountBlocked.into_app_error().status_code(), 403);
    }

    #[test]
    fn test_store_unavailable_maps_to_503() {
        let err = AuthError::Store(sqlx::Error::PoolTimedOut).into_app_error();
        assert_eq!(err.status_code(), 503);
        assert_eq!(err.code(), STORE_UNAVAILABLE);
    }

    #[test]
    fn test_other_store_errors_are_opaque_500() {
        let err = AuthError::Store(sqlx::Error::RowNotFound).into_app_error();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.message(), "Internal server error");
    }

    #[test]
    fn test_store_kind_and_code_agree_with_wire_status() {
        for err in [
            AuthError::Store(sqlx::Error::PoolTimedOut),
            AuthError::Store(sqlx::Error::RowNotFound),
            AuthError::Store(sqlx::Error::Protocol("bad frame".into())),
        ] {
            let kind = err.kind();
            let code = err.code();
            let app = err.into_app_error();
            assert_eq!(kind, app.kind());
            assert_eq!(code, app.code());
        }
        assert_eq!(
            AuthError::Store(sqlx::Error::RowNotFound).kind(),
            ErrorKind::InternalServerError
        );
    }

    #[test]
    fn test_internal_message_not_leaked() {
        let err = AuthError::Internal("join error: panicked".to_string()).into_app_error();
        assert_eq!(err.message(), "Internal server error");
    }

    #[test]
    fn test_token_error_conversion() {
        assert!(matches!(
            AuthError::from(TokenError::Expired),
            AuthError::TokenExpired
        ));
        assert!(matches!(
            AuthError::from(TokenError::BadSignature),
            AuthError::InvalidToken
        ));
    }
}
