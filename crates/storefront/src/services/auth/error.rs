//! Authentication error types.

use thiserror::Error;

use furnspace_core::EmailError;

use crate::db::RepositoryError;
use crate::services::email::EmailError as MailError;
use crate::services::tokens::TokenError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// A required field was missing or blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// A verified account already uses this email.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Invalid credentials (wrong password or unknown user).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The account was deactivated by an admin.
    #[error("account is deactivated")]
    AccountDisabled,

    /// The signup OTP has not been confirmed yet.
    #[error("email not verified")]
    EmailNotVerified,

    /// The supplied verification code does not match.
    #[error("invalid verification code")]
    InvalidOtp,

    /// No pending verification, or the code has expired.
    #[error("verification code not found or expired")]
    OtpExpired,

    /// Token verification failed.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// The token was revoked by a logout.
    #[error("token revoked")]
    TokenRevoked,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Verification email could not be sent.
    #[error("email delivery error: {0}")]
    Delivery(#[from] MailError),

    /// The blacklist store could not be reached.
    #[error("token blacklist error: {0}")]
    Blacklist(#[from] redis::RedisError),
}
