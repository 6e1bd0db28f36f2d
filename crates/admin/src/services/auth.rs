//! Admin authentication: password login and JWT issue/verify.
//!
//! Deliberately narrower than the storefront's auth: no signup, no OTP, no
//! refresh tokens, no blacklist. Admin accounts are created via the CLI
//! and tokens simply expire.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use furnspace_core::{AdminUserId, Email};

use crate::config::AdminJwtConfig;
use crate::db::{AdminUserRepository, RepositoryError};
use crate::models::admin_user::{AdminRole, AdminUser};

/// Errors that can occur during admin authentication.
#[derive(Debug, thiserror::Error)]
pub enum AdminAuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] furnspace_core::EmailError),

    /// Invalid credentials (unknown admin or wrong password).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The token has expired.
    #[error("token expired")]
    TokenExpired,

    /// The token is malformed or mis-signed.
    #[error("invalid token")]
    TokenInvalid,

    /// Token signing failed.
    #[error("token signing failed: {0}")]
    Signing(jsonwebtoken::errors::Error),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hash could not be parsed.
    #[error("password hashing error")]
    PasswordHash,
}

/// Claims carried by an admin token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Admin user ID, as a string per JWT convention.
    pub sub: String,
    /// Admin email at issuance time.
    pub email: String,
    /// Permission level.
    pub role: AdminRole,
    /// Unique token ID.
    pub jti: String,
    /// Issued-at (unix seconds).
    pub iat: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
    /// Issuer.
    pub iss: String,
}

impl AdminClaims {
    /// The admin this token was issued to.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::TokenInvalid` if the subject is not numeric.
    pub fn admin_id(&self) -> Result<AdminUserId, AdminAuthError> {
        self.sub
            .parse::<i32>()
            .map(AdminUserId::new)
            .map_err(|_| AdminAuthError::TokenInvalid)
    }
}

/// An issued admin token with its expiry timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedAdminToken {
    pub token: String,
    /// Expiry as unix seconds.
    pub expires_at: i64,
}

/// Issues and verifies admin JWTs.
#[derive(Clone)]
pub struct AdminTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    ttl_secs: i64,
}

impl AdminTokenService {
    /// Create a token service from admin JWT configuration.
    #[must_use]
    pub fn new(config: &AdminJwtConfig) -> Self {
        let secret = config.secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            issuer: config.issuer.clone(),
            ttl_secs: config.ttl_secs,
        }
    }

    /// Issue a token for an admin user.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::Signing` if encoding fails.
    pub fn issue(&self, admin: &AdminUser) -> Result<IssuedAdminToken, AdminAuthError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.ttl_secs);

        let claims = AdminClaims {
            sub: admin.id.to_string(),
            email: admin.email.as_str().to_owned(),
            role: admin.role,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: self.issuer.clone(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding)
            .map_err(AdminAuthError::Signing)?;

        Ok(IssuedAdminToken {
            token,
            expires_at: exp.timestamp(),
        })
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::TokenExpired` or
    /// `AdminAuthError::TokenInvalid`.
    pub fn verify(&self, token: &str) -> Result<AdminClaims, AdminAuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        let data =
            decode::<AdminClaims>(token, &self.decoding, &validation).map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AdminAuthError::TokenExpired,
                _ => AdminAuthError::TokenInvalid,
            })?;

        Ok(data.claims)
    }
}

/// Admin authentication service.
pub struct AdminAuthService<'a> {
    admins: AdminUserRepository<'a>,
    tokens: &'a AdminTokenService,
}

impl<'a> AdminAuthService<'a> {
    /// Create a new admin authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tokens: &'a AdminTokenService) -> Self {
        Self {
            admins: AdminUserRepository::new(pool),
            tokens,
        }
    }

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Unknown email and wrong password are indistinguishable
    /// (`AdminAuthError::InvalidCredentials`).
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(AdminUser, IssuedAdminToken), AdminAuthError> {
        let email = Email::parse(email)?;

        let (admin, password_hash) = self
            .admins
            .get_with_password_hash(&email)
            .await?
            .ok_or(AdminAuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        let token = self.tokens.issue(&admin)?;
        tracing::info!(admin_id = %admin.id, "admin logged in");
        Ok((admin, token))
    }
}

/// Verify a password against a stored Argon2 hash.
fn verify_password(password: &str, password_hash: &str) -> Result<(), AdminAuthError> {
    let parsed = PasswordHash::new(password_hash).map_err(|_| AdminAuthError::PasswordHash)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AdminAuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn test_tokens() -> AdminTokenService {
        AdminTokenService::new(&AdminJwtConfig {
            secret: SecretString::from("k9#mQ2$vX7!pL4@wZ8&nB3*rT6^yH1%d"),
            issuer: "furnspace-admin-test".to_string(),
            ttl_secs: 3600,
        })
    }

    fn test_admin(role: AdminRole) -> AdminUser {
        AdminUser {
            id: AdminUserId::new(1),
            email: Email::parse("ops@example.com").unwrap(),
            name: "Ops".to_string(),
            role,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let tokens = test_tokens();
        let issued = tokens.issue(&test_admin(AdminRole::Admin)).unwrap();

        let claims = tokens.verify(&issued.token).unwrap();
        assert_eq!(claims.sub, "1");
        assert_eq!(claims.role, AdminRole::Admin);
        assert_eq!(claims.admin_id().unwrap(), AdminUserId::new(1));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let tokens = test_tokens();
        assert!(matches!(
            tokens.verify("not.a.token"),
            Err(AdminAuthError::TokenInvalid)
        ));
    }

    #[test]
    fn test_role_survives_roundtrip() {
        let tokens = test_tokens();
        let issued = tokens.issue(&test_admin(AdminRole::Viewer)).unwrap();
        let claims = tokens.verify(&issued.token).unwrap();
        assert!(!claims.role.can_write());
    }
}
