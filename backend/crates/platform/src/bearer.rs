//! Bearer credential extraction
//!
//! Parses `Authorization: Bearer <token>` (RFC 6750) from request headers.

use axum::http::{HeaderMap, header};

/// Error when extracting a bearer token
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BearerError {
    #[error("Missing Authorization header")]
    Missing,

    #[error("Authorization header is not a bearer credential")]
    Malformed,
}

/// Extract the bearer token from the `Authorization` header
///
/// The scheme name is matched case-insensitively; the token itself is
/// returned as-is (surrounding whitespace trimmed).
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, BearerError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(BearerError::Missing)?
        .to_str()
        .map_err(|_| BearerError::Malformed)?;

    let (scheme, token) = value.trim().split_once(' ').ok_or(BearerError::Malformed)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(BearerError::Malformed);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(BearerError::Malformed);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_extract_bearer_token() {
        let headers = headers_with("Bearer abc.def");
        assert_eq!(extract_bearer_token(&headers), Ok("abc.def"));
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let headers = headers_with("bearer abc.def");
        assert_eq!(extract_bearer_token(&headers), Ok("abc.def"));
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(
            extract_bearer_token(&HeaderMap::new()),
            Err(BearerError::Missing)
        );
    }

    #[test]
    fn test_other_scheme_rejected() {
        let headers = headers_with("Basic dXNlcjpwYXNz");
        assert_eq!(extract_bearer_token(&headers), Err(BearerError::Malformed));
    }

    #[test]
    fn test_empty_token_rejected() {
        assert_eq!(
            extract_bearer_token(&headers_with("Bearer    ")),
            Err(BearerError::Malformed)
        );
        assert_eq!(
            extract_bearer_token(&headers_with("Bearer")),
            Err(BearerError::Malformed)
        );
    }
}
