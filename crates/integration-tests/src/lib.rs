//! Integration tests for Furnspace.
//!
//! # Running Tests
//!
//! The tests in `tests/` drive live servers over HTTP and peek into the
//! database for the pieces that normally arrive by email (the signup OTP)
//! or are admin-only (marking an order delivered). They are `#[ignore]`d
//! by default; a full run needs:
//!
//! ```bash
//! # Database + Redis up, migrations applied, demo catalog seeded
//! cargo run -p furnspace-cli -- migrate all
//! cargo run -p furnspace-cli -- seed
//!
//! # Both servers running
//! cargo run -p furnspace-storefront &
//! cargo run -p furnspace-admin &
//!
//! # Then
//! cargo test -p furnspace-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_BASE_URL` (default: http://localhost:3000)
//! - `ADMIN_BASE_URL` (default: http://localhost:3001)
//! - `DATABASE_URL` - for OTP lookup and order-status fixtures
//! - `ADMIN_TEST_EMAIL` / `ADMIN_TEST_PASSWORD` - a CLI-created admin

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::Client;
use sqlx::PgPool;
use uuid::Uuid;

/// Shared context for integration tests.
pub struct TestContext {
    pub client: Client,
    pub storefront_url: String,
    pub admin_url: String,
    pool: Option<PgPool>,
}

impl TestContext {
    /// Build a context from environment variables.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            storefront_url: std::env::var("STOREFRONT_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            admin_url: std::env::var("ADMIN_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3001".to_string()),
            pool: None,
        }
    }

    /// Connect to the database (cached on first use).
    ///
    /// # Panics
    ///
    /// Panics if `DATABASE_URL` is unset or unreachable - these tests
    /// cannot run without it.
    pub async fn pool(&mut self) -> &PgPool {
        if self.pool.is_none() {
            let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
            let pool = PgPool::connect(&url).await.expect("database unreachable");
            self.pool = Some(pool);
        }
        self.pool.as_ref().expect("pool initialized above")
    }

    /// Fetch the pending signup OTP for an email straight from the
    /// database, standing in for reading the verification email.
    ///
    /// # Panics
    ///
    /// Panics if no pending code exists for the email.
    pub async fn verification_code_for(&mut self, email: &str) -> String {
        let pool = self.pool().await;
        let (code,): (String,) = sqlx::query_as(
            "SELECT evc.code FROM email_verification_codes evc
             JOIN users u ON u.id = evc.user_id
             WHERE u.email = $1",
        )
        .bind(email)
        .fetch_one(pool)
        .await
        .expect("pending verification code for email");
        code
    }

    /// Force an order's fulfillment status, standing in for the admin
    /// moving it through the lifecycle.
    pub async fn force_order_status(&mut self, order_id: i64, status: &str) {
        let pool = self.pool().await;
        sqlx::query("UPDATE orders SET status = $2, updated_at = now() WHERE id = $1")
            .bind(order_id)
            .bind(status)
            .execute(pool)
            .await
            .expect("order status update");
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A unique throwaway email for one test run.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@integration.test", Uuid::new_v4().simple())
}
