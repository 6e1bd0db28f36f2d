//! JWT issuance and verification.
//!
//! Access and refresh tokens are signed with separate secrets and carry a
//! `use` claim, so one kind can never be replayed as the other. Every token
//! gets a `jti`, which is what the logout blacklist keys on.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use furnspace_core::UserId;

use crate::config::JwtConfig;

/// Which kind of token a set of claims belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenUse {
    Access,
    Refresh,
}

/// JWT claims carried by both token kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID, as a string per JWT convention.
    pub sub: String,
    /// User email at issuance time.
    pub email: String,
    /// Access or refresh discriminator.
    #[serde(rename = "use")]
    pub token_use: TokenUse,
    /// Unique token ID; the blacklist key.
    pub jti: String,
    /// Issued-at (unix seconds).
    pub iat: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
    /// Issuer.
    pub iss: String,
}

impl Claims {
    /// The user this token was issued to.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` if the subject is not a numeric ID.
    pub fn user_id(&self) -> Result<UserId, TokenError> {
        self.sub
            .parse::<i32>()
            .map(UserId::new)
            .map_err(|_| TokenError::Invalid)
    }

    /// Seconds until this token expires, clamped at zero.
    #[must_use]
    pub fn seconds_until_expiry(&self) -> i64 {
        (self.exp - Utc::now().timestamp()).max(0)
    }
}

/// Errors from token verification or issuance.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The token's signature/shape is fine but it has expired.
    #[error("token expired")]
    Expired,
    /// The token is malformed, mis-signed, mis-issued, or of the wrong kind.
    #[error("invalid token")]
    Invalid,
    /// Signing failed (effectively unreachable with HMAC keys).
    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// An issued token with its expiry timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    /// Expiry as unix seconds.
    pub expires_at: i64,
}

/// Issues and verifies the storefront's access and refresh tokens.
#[derive(Clone)]
pub struct TokenService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    issuer: String,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl TokenService {
    /// Create a token service from JWT configuration.
    #[must_use]
    pub fn new(config: &JwtConfig) -> Self {
        let access_secret = config.access_secret.expose_secret().as_bytes();
        let refresh_secret = config.refresh_secret.expose_secret().as_bytes();

        Self {
            access_encoding: EncodingKey::from_secret(access_secret),
            access_decoding: DecodingKey::from_secret(access_secret),
            refresh_encoding: EncodingKey::from_secret(refresh_secret),
            refresh_decoding: DecodingKey::from_secret(refresh_secret),
            issuer: config.issuer.clone(),
            access_ttl_secs: config.access_ttl_secs,
            refresh_ttl_secs: config.refresh_ttl_secs,
        }
    }

    /// Issue an access token for a user.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue_access(&self, user_id: UserId, email: &str) -> Result<IssuedToken, TokenError> {
        self.issue(user_id, email, TokenUse::Access, self.access_ttl_secs)
    }

    /// Issue a refresh token for a user.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue_refresh(&self, user_id: UserId, email: &str) -> Result<IssuedToken, TokenError> {
        self.issue(user_id, email, TokenUse::Refresh, self.refresh_ttl_secs)
    }

    /// Verify an access token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` for expired tokens, `TokenError::Invalid`
    /// for anything else that fails verification (including a refresh token
    /// presented as an access token).
    pub fn verify_access(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token, &self.access_decoding, TokenUse::Access)
    }

    /// Verify a refresh token and return its claims.
    ///
    /// # Errors
    ///
    /// Same contract as [`Self::verify_access`], for the refresh key and kind.
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token, &self.refresh_decoding, TokenUse::Refresh)
    }

    fn issue(
        &self,
        user_id: UserId,
        email: &str,
        token_use: TokenUse,
        ttl_secs: i64,
    ) -> Result<IssuedToken, TokenError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(ttl_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_owned(),
            token_use,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: self.issuer.clone(),
        };

        let key = match token_use {
            TokenUse::Access => &self.access_encoding,
            TokenUse::Refresh => &self.refresh_encoding,
        };

        let token = encode(&Header::default(), &claims, key)?;

        Ok(IssuedToken {
            token,
            expires_at: exp.timestamp(),
        })
    }

    fn verify(
        &self,
        token: &str,
        key: &DecodingKey,
        expected_use: TokenUse,
    ) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        let data = decode::<Claims>(token, key, &validation).map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })?;

        if data.claims.token_use != expected_use {
            return Err(TokenError::Invalid);
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn test_service() -> TokenService {
        TokenService::new(&JwtConfig {
            access_secret: SecretString::from("k9#mQ2$vX7!pL4@wZ8&nB3*rT6^yH1%d"),
            refresh_secret: SecretString::from("f5@jW8#sE2$hN6!qV9&xC4*gM7^uK3%a"),
            issuer: "furnspace-test".to_string(),
            access_ttl_secs: 3600,
            refresh_ttl_secs: 604_800,
        })
    }

    #[test]
    fn test_issue_and_verify_access() {
        let service = test_service();
        let issued = service.issue_access(UserId::new(5), "a@b.com").unwrap();

        let claims = service.verify_access(&issued.token).unwrap();
        assert_eq!(claims.sub, "5");
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.token_use, TokenUse::Access);
        assert_eq!(claims.user_id().unwrap(), UserId::new(5));
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let service = test_service();
        let issued = service.issue_refresh(UserId::new(5), "a@b.com").unwrap();

        // Different signing key AND different `use` claim - must not verify.
        assert!(matches!(
            service.verify_access(&issued.token),
            Err(TokenError::Invalid)
        ));
        assert!(service.verify_refresh(&issued.token).is_ok());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let service = test_service();
        assert!(matches!(
            service.verify_access("not.a.token"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_issuer_mismatch_rejected() {
        let service = test_service();
        let other = TokenService::new(&JwtConfig {
            access_secret: SecretString::from("k9#mQ2$vX7!pL4@wZ8&nB3*rT6^yH1%d"),
            refresh_secret: SecretString::from("f5@jW8#sE2$hN6!qV9&xC4*gM7^uK3%a"),
            issuer: "someone-else".to_string(),
            access_ttl_secs: 3600,
            refresh_ttl_secs: 604_800,
        });

        let issued = other.issue_access(UserId::new(5), "a@b.com").unwrap();
        assert!(matches!(
            service.verify_access(&issued.token),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_distinct_jti_per_token() {
        let service = test_service();
        let a = service.issue_access(UserId::new(1), "a@b.com").unwrap();
        let b = service.issue_access(UserId::new(1), "a@b.com").unwrap();

        let ca = service.verify_access(&a.token).unwrap();
        let cb = service.verify_access(&b.token).unwrap();
        assert_ne!(ca.jti, cb.jti);
    }
}
