//! Authentication extractor.
//!
//! Route handlers that take a [`CurrentUser`] parameter require a valid,
//! non-blacklisted Bearer access token. Verification order matches the
//! token lifecycle: signature and expiry first, then the logout blacklist.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};

use furnspace_core::UserId;

use crate::error::AppError;
use crate::services::tokens::{Claims, TokenError};
use crate::state::AppState;

/// Extractor for the authenticated user.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(user: CurrentUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.claims.email)
/// }
/// ```
pub struct CurrentUser {
    /// The authenticated user's ID.
    pub id: UserId,
    /// Full verified claims from the access token.
    pub claims: Claims,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("Access token is missing".to_string()))?;

        let claims = state.tokens().verify_access(token).map_err(|e| match e {
            TokenError::Expired => AppError::Unauthorized("Access token expired".to_string()),
            _ => AppError::Unauthorized("Invalid access token".to_string()),
        })?;

        let revoked = state.blacklist().is_revoked(&claims.jti).await.map_err(|e| {
            AppError::Internal(format!("blacklist lookup failed: {e}"))
        })?;
        if revoked {
            return Err(AppError::Unauthorized("Token is blacklisted".to_string()));
        }

        let id = claims
            .user_id()
            .map_err(|_| AppError::Unauthorized("Invalid access token".to_string()))?;

        Ok(Self { id, claims })
    }
}

/// Extract the Bearer token from the Authorization header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extracted() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_token_missing_header() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let headers = headers_with("Basic dXNlcjpwYXNz");
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_bearer_token_empty() {
        let headers = headers_with("Bearer ");
        assert_eq!(bearer_token(&headers), None);
    }
}
