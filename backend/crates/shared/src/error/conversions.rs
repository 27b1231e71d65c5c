//! Error conversions - From implementations for common error types
//!
//! Provides automatic conversion from common error types to [`AppError`],
//! and the HTTP rendering of [`AppError`].

use super::app_error::AppError;

/// Code attached to every error caused by an unreachable backing store.
pub const STORE_UNAVAILABLE: &str = "STORE_UNAVAILABLE";

// ============================================================================
// serde_json conversions
// ============================================================================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() || err.is_eof() {
            AppError::bad_request(format!("JSON parse error: {}", err)).with_source(err)
        } else {
            AppError::internal("JSON serialization error").with_source(err)
        }
    }
}

// ============================================================================
// SQLx conversions (feature-gated)
// ============================================================================

/// Whether `err` means the store could not be reached or had no capacity
///
/// Matches exactly the cases the `sqlx::Error` conversion renders as 503.
#[cfg(feature = "sqlx")]
pub fn is_store_unavailable(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => true,
        sqlx::Error::Database(db_err) => matches!(
            db_err.code().as_deref(),
            Some(
                "53000" | "53100" | "53200" | "53300" | "57000" | "57014" | "57P01" | "57P02"
                    | "57P03"
            )
        ),
        _ => false,
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::not_found("Record not found").with_source(err),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                AppError::service_unavailable("Database connection pool exhausted")
                    .with_code(STORE_UNAVAILABLE)
                    .with_source(err)
            }
            sqlx::Error::Database(db_err) => {
                // PostgreSQL specific error codes
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                let app_err = match db_err.code().as_deref() {
                    // Class 23: Integrity Constraint Violation
                    Some("23505") => AppError::conflict("Duplicate key value"),
                    Some("23502") => AppError::bad_request("Required field is null"),
                    Some("23514") => AppError::bad_request("Check constraint violation"),
                    // Class 53: Insufficient Resources
                    Some("53000" | "53100" | "53200" | "53300") => {
                        AppError::service_unavailable("Database resource exhausted")
                            .with_code(STORE_UNAVAILABLE)
                    }
                    // Class 57: Operator Intervention
                    Some("57000" | "57014" | "57P01" | "57P02" | "57P03") => {
                        AppError::service_unavailable("Database unavailable")
                            .with_code(STORE_UNAVAILABLE)
                    }
                    _ => AppError::internal("Database error"),
                };
                app_err.with_source(err)
            }
            sqlx::Error::Io(_) => AppError::service_unavailable("Database connection error")
                .with_code(STORE_UNAVAILABLE)
                .with_source(err),
            sqlx::Error::Tls(_) => AppError::internal("Database TLS error").with_source(err),
            _ => AppError::internal("Database error").with_source(err),
        }
    }
}

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::{HeaderValue, StatusCode, header};

        use super::kind::ErrorKind;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = serde_json::json!({
            "detail": self.message(),
            "code": self.code(),
            "status": self.status_code(),
        });

        let mut response = (status, Json(body)).into_response();

        // RFC 6750: challenge the client on missing/invalid bearer credentials
        if self.kind() == ErrorKind::Unauthorized {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::kind::ErrorKind;

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let app_err: AppError = json_err.into();
        assert_eq!(app_err.kind(), ErrorKind::BadRequest);
    }

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_store_unavailable_matches_conversion() {
        let unavailable = [
            sqlx::Error::PoolTimedOut,
            sqlx::Error::PoolClosed,
            sqlx::Error::Io(std::io::Error::from(std::io::ErrorKind::ConnectionRefused)),
        ];
        for err in unavailable {
            assert!(is_store_unavailable(&err));
            let app = AppError::from(err);
            assert_eq!(app.kind(), ErrorKind::ServiceUnavailable);
            assert_eq!(app.code(), STORE_UNAVAILABLE);
        }

        let err = sqlx::Error::Protocol("unexpected message".into());
        assert!(!is_store_unavailable(&err));
        assert_eq!(AppError::from(err).kind(), ErrorKind::InternalServerError);
    }

    #[cfg(feature = "axum")]
    #[test]
    fn test_unauthorized_response_carries_bearer_challenge() {
        use axum::http::{StatusCode, header};
        use axum::response::IntoResponse;

        let response = AppError::unauthorized("Invalid authentication credentials").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[cfg(feature = "axum")]
    #[test]
    fn test_forbidden_response_has_no_challenge() {
        use axum::http::{StatusCode, header};
        use axum::response::IntoResponse;

        let response = AppError::forbidden("Not authorized").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }
}
