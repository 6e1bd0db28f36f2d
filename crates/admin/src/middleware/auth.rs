//! Admin authentication extractors.
//!
//! [`CurrentAdmin`] requires a valid Bearer admin token. [`RequireWrite`]
//! additionally rejects read-only roles; mutating handlers take it instead.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};

use furnspace_core::AdminUserId;

use crate::error::AdminError;
use crate::models::admin_user::AdminRole;
use crate::services::auth::{AdminAuthError, AdminClaims};
use crate::state::AppState;

/// Extractor for the authenticated admin.
pub struct CurrentAdmin {
    /// The authenticated admin's ID.
    pub id: AdminUserId,
    /// Permission level from the token.
    pub role: AdminRole,
    /// Full verified claims.
    pub claims: AdminClaims,
}

impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = AdminError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AdminError::Unauthorized("Access token is missing".to_string()))?;

        let claims = state.tokens().verify(token).map_err(|e| match e {
            AdminAuthError::TokenExpired => {
                AdminError::Unauthorized("Access token expired".to_string())
            }
            _ => AdminError::Unauthorized("Invalid access token".to_string()),
        })?;

        let id = claims
            .admin_id()
            .map_err(|_| AdminError::Unauthorized("Invalid access token".to_string()))?;

        Ok(Self {
            id,
            role: claims.role,
            claims,
        })
    }
}

/// Extractor for admins whose role may modify data.
pub struct RequireWrite(pub CurrentAdmin);

impl FromRequestParts<AppState> for RequireWrite {
    type Rejection = AdminError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let admin = CurrentAdmin::from_request_parts(parts, state).await?;

        if !admin.role.can_write() {
            return Err(AdminError::Forbidden(
                "This role has read-only access".to_string(),
            ));
        }

        Ok(Self(admin))
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

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer token-value"),
        );
        assert_eq!(bearer_token(&headers), Some("token-value"));
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
