//! Redis-backed token blacklist.
//!
//! Logout writes the token's `jti` here with a TTL equal to the token's
//! remaining validity, so the entry expires exactly when the token would
//! have. Auth middleware and the refresh endpoint check membership before
//! accepting a token.

use redis::{AsyncCommands, Client, aio::MultiplexedConnection};

/// Key prefix for blacklist entries.
const KEY_PREFIX: &str = "blacklist:";

/// Token blacklist backed by Redis.
#[derive(Clone)]
pub struct TokenBlacklist {
    client: Client,
}

impl TokenBlacklist {
    /// Create a blacklist client.
    ///
    /// # Errors
    ///
    /// Returns `redis::RedisError` if the URL cannot be parsed. No
    /// connection is made until the first operation.
    pub fn new(redis_url: &str) -> Result<Self, redis::RedisError> {
        let client = Client::open(redis_url)?;
        Ok(Self { client })
    }

    async fn conn(&self) -> Result<MultiplexedConnection, redis::RedisError> {
        self.client.get_multiplexed_async_connection().await
    }

    /// Revoke a token by its `jti` for `ttl_secs` seconds.
    ///
    /// A non-positive TTL means the token is already expired and there is
    /// nothing to revoke.
    ///
    /// # Errors
    ///
    /// Returns `redis::RedisError` if the write fails.
    pub async fn revoke(&self, jti: &str, ttl_secs: i64) -> Result<(), redis::RedisError> {
        let Ok(ttl) = u64::try_from(ttl_secs) else {
            return Ok(());
        };
        if ttl == 0 {
            return Ok(());
        }

        let mut conn = self.conn().await?;
        let _: () = conn.set_ex(format!("{KEY_PREFIX}{jti}"), 1u8, ttl).await?;

        tracing::debug!(jti, ttl, "token revoked");
        Ok(())
    }

    /// Whether a token `jti` has been revoked.
    ///
    /// # Errors
    ///
    /// Returns `redis::RedisError` if the lookup fails. Callers treat a
    /// failed lookup as an error rather than an allow - the blacklist is a
    /// security control.
    pub async fn is_revoked(&self, jti: &str) -> Result<bool, redis::RedisError> {
        let mut conn = self.conn().await?;
        conn.exists(format!("{KEY_PREFIX}{jti}")).await
    }

    /// Ping Redis, for the readiness probe.
    ///
    /// # Errors
    ///
    /// Returns `redis::RedisError` if Redis is unreachable.
    pub async fn health_check(&self) -> Result<(), redis::RedisError> {
        let mut conn = self.conn().await?;
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map(|_| ())
    }
}
