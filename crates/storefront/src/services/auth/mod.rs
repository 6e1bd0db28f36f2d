//! Authentication service.
//!
//! Owns the signup/OTP flow, login, token refresh, and logout. Passwords
//! are hashed with Argon2id; tokens are JWTs from [`TokenService`]; revoked
//! tokens live in the Redis blacklist until they would have expired anyway.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use rand::Rng;
use serde::Serialize;
use sqlx::PgPool;

use furnspace_core::{Email, UserId};

use crate::db::{RepositoryError, UserRepository};
use crate::models::User;
use crate::services::blacklist::TokenBlacklist;
use crate::services::email::EmailService;
use crate::services::tokens::{Claims, IssuedToken, TokenService};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Access + refresh tokens issued together at login / OTP verification.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    /// Access token expiry, unix seconds.
    pub access_expires_at: i64,
    pub refresh_token: String,
    /// Refresh token expiry, unix seconds.
    pub refresh_expires_at: i64,
}

/// Signup details accepted by [`AuthService::register`].
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    tokens: &'a TokenService,
    blacklist: &'a TokenBlacklist,
    mailer: &'a EmailService,
    otp_ttl_secs: i64,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(
        pool: &'a PgPool,
        tokens: &'a TokenService,
        blacklist: &'a TokenBlacklist,
        mailer: &'a EmailService,
        otp_ttl_secs: i64,
    ) -> Self {
        Self {
            users: UserRepository::new(pool),
            tokens,
            blacklist,
            mailer,
            otp_ttl_secs,
        }
    }

    /// Register a new user and email them a verification code.
    ///
    /// The account is created unverified and cannot log in until the code
    /// is confirmed. Re-registering an unverified email replaces the
    /// pending details and reissues the code; a verified email conflicts.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserAlreadyExists` for verified emails, plus the
    /// usual validation, repository, and delivery errors.
    pub async fn register(&self, input: RegisterInput) -> Result<User, AuthError> {
        let email = Email::parse(&input.email)?;
        let first_name = required_field(&input.first_name, "first_name")?;
        let last_name = required_field(&input.last_name, "last_name")?;
        validate_password(&input.password)?;
        let password_hash = hash_password(&input.password)?;

        let user = match self.users.get_by_email(&email).await? {
            Some(existing) if existing.is_verified => return Err(AuthError::UserAlreadyExists),
            Some(existing) => {
                self.users
                    .update_pending(existing.id, first_name, last_name, &password_hash)
                    .await?
            }
            None => self
                .users
                .create_unverified(&email, first_name, last_name, &password_hash)
                .await
                .map_err(|e| match e {
                    RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                    other => AuthError::Repository(other),
                })?,
        };

        let code = generate_otp(&mut rand::rng());
        let expires_at = Utc::now() + Duration::seconds(self.otp_ttl_secs);
        self.users
            .upsert_verification_code(user.id, &code, expires_at)
            .await?;

        self.mailer.send_verification_code(&user.email, &code).await?;

        tracing::info!(user_id = %user.id, "registration started, verification code sent");
        Ok(user)
    }

    /// Confirm a signup verification code and log the user in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::OtpExpired` when there is nothing to verify (no
    /// such user, no pending code, or the code aged out) and
    /// `AuthError::InvalidOtp` when the code does not match.
    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<(User, TokenPair), AuthError> {
        let email = Email::parse(email)?;
        let code = code.trim();
        if code.is_empty() {
            return Err(AuthError::MissingField("verification_code"));
        }

        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::OtpExpired)?;

        let (stored_code, expires_at) = self
            .users
            .get_verification_code(user.id)
            .await?
            .ok_or(AuthError::OtpExpired)?;

        if expires_at < Utc::now() {
            return Err(AuthError::OtpExpired);
        }

        if stored_code != code {
            return Err(AuthError::InvalidOtp);
        }

        let user = self.users.mark_verified(user.id).await?;
        self.users.delete_verification_code(user.id).await?;

        let pair = self.issue_pair(&user)?;
        tracing::info!(user_id = %user.id, "email verified");
        Ok((user, pair))
    }

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Unknown email and wrong password are indistinguishable
    /// (`AuthError::InvalidCredentials`). Deactivated and unverified
    /// accounts are rejected with their own variants.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, TokenPair), AuthError> {
        let email = Email::parse(email)?;

        let (user, password_hash) = self
            .users
            .get_with_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        if !user.is_active {
            return Err(AuthError::AccountDisabled);
        }
        if !user.is_verified {
            return Err(AuthError::EmailNotVerified);
        }

        let pair = self.issue_pair(&user)?;
        Ok((user, pair))
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// The refresh token itself is not rotated.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenRevoked` for blacklisted tokens and token
    /// errors for everything that fails verification.
    pub async fn refresh(&self, refresh_token: &str) -> Result<IssuedToken, AuthError> {
        let claims = self.tokens.verify_refresh(refresh_token)?;

        if self.blacklist.is_revoked(&claims.jti).await? {
            return Err(AuthError::TokenRevoked);
        }

        let user_id = claims.user_id()?;
        let user = self
            .users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        if !user.is_active {
            return Err(AuthError::AccountDisabled);
        }

        Ok(self.tokens.issue_access(user.id, user.email.as_str())?)
    }

    /// Log out: blacklist the presented access token, and the refresh token
    /// when one is supplied.
    ///
    /// An invalid refresh token is ignored - there is nothing to revoke.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Blacklist` if the revocation write fails.
    pub async fn logout(
        &self,
        access_claims: &Claims,
        refresh_token: Option<&str>,
    ) -> Result<(), AuthError> {
        self.blacklist
            .revoke(&access_claims.jti, access_claims.seconds_until_expiry())
            .await?;

        if let Some(token) = refresh_token
            && let Ok(claims) = self.tokens.verify_refresh(token)
        {
            self.blacklist
                .revoke(&claims.jti, claims.seconds_until_expiry())
                .await?;
        }

        tracing::info!(user_id = %access_claims.sub, "logged out");
        Ok(())
    }

    /// Change the user's password after verifying the current one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` when the current password is
    /// wrong and `AuthError::WeakPassword` when the new one fails validation.
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let password_hash = self
            .users
            .get_password_hash(user_id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(current_password, &password_hash)?;
        validate_password(new_password)?;

        let new_hash = hash_password(new_password)?;
        self.users.update_password(user_id, &new_hash).await?;

        tracing::info!(user_id = %user_id, "password changed");
        Ok(())
    }

    fn issue_pair(&self, user: &User) -> Result<TokenPair, AuthError> {
        let access = self.tokens.issue_access(user.id, user.email.as_str())?;
        let refresh = self.tokens.issue_refresh(user.id, user.email.as_str())?;

        Ok(TokenPair {
            access_token: access.token,
            access_expires_at: access.expires_at,
            refresh_token: refresh.token,
            refresh_expires_at: refresh.expires_at,
        })
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Trim a field and reject blanks.
fn required_field<'s>(value: &'s str, name: &'static str) -> Result<&'s str, AuthError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AuthError::MissingField(name));
    }
    Ok(trimmed)
}

/// Validate password requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored Argon2 hash.
fn verify_password(password: &str, password_hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(password_hash).map_err(|_| AuthError::PasswordHash)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// Generate a six-digit verification code.
fn generate_otp<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{:06}", rng.random_range(100_000..=999_999u32))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_validate_password_rejects_short() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("longenough").is_ok());
    }

    #[test]
    fn test_required_field_trims() {
        assert_eq!(required_field("  Ada ", "first_name").unwrap(), "Ada");
        assert!(matches!(
            required_field("   ", "first_name"),
            Err(AuthError::MissingField("first_name"))
        ));
    }

    #[test]
    fn test_generate_otp_shape() {
        let mut rng = rand::rng();
        for _ in 0..50 {
            let code = generate_otp(&mut rng);
            assert_eq!(code.len(), 6);
            assert!(code.bytes().all(|b| b.is_ascii_digit()));
        }
    }
}
