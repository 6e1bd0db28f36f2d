//! Integration tests for the storefront auth flow.
//!
//! These tests require running servers and a reachable database; see the
//! crate README comment in src/lib.rs. Run with `-- --ignored`.

use furnspace_integration_tests::{TestContext, unique_email};
use reqwest::StatusCode;
use serde_json::{Value, json};

const PASSWORD: &str = "integration-pass-1";

/// Register an account and pull its OTP from the database.
async fn register(ctx: &mut TestContext, email: &str) -> String {
    let resp = ctx
        .client
        .post(format!("{}/auth/register", ctx.storefront_url))
        .json(&json!({
            "first_name": "Test",
            "last_name": "Shopper",
            "email": email,
            "password": PASSWORD,
        }))
        .send()
        .await
        .expect("register request");
    assert_eq!(resp.status(), StatusCode::CREATED);

    ctx.verification_code_for(email).await
}

/// Register + verify, returning (`access_token`, `refresh_token`).
async fn register_and_verify(ctx: &mut TestContext, email: &str) -> (String, String) {
    let code = register(ctx, email).await;

    let resp = ctx
        .client
        .post(format!("{}/auth/verify-otp", ctx.storefront_url))
        .json(&json!({ "email": email, "verification_code": code }))
        .send()
        .await
        .expect("verify request");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("verify body");
    (
        body["access_token"].as_str().expect("access token").to_string(),
        body["refresh_token"].as_str().expect("refresh token").to_string(),
    )
}

#[tokio::test]
#[ignore = "Requires running storefront server, database, Redis, and SMTP"]
async fn test_register_verify_login_roundtrip() {
    let mut ctx = TestContext::new();
    let email = unique_email("auth");

    let (access, _refresh) = register_and_verify(&mut ctx, &email).await;

    // The access token works.
    let resp = ctx
        .client
        .get(format!("{}/account", ctx.storefront_url))
        .bearer_auth(&access)
        .send()
        .await
        .expect("account request");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("account body");
    assert_eq!(body["user"]["email"], email);

    // A fresh login also works.
    let resp = ctx
        .client
        .post(format!("{}/auth/login", ctx.storefront_url))
        .json(&json!({ "email": email, "password": PASSWORD }))
        .send()
        .await
        .expect("login request");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server, database, Redis, and SMTP"]
async fn test_login_rejects_wrong_password_and_unverified() {
    let mut ctx = TestContext::new();
    let email = unique_email("auth");

    // Unverified account cannot log in.
    let _code = register(&mut ctx, &email).await;
    let resp = ctx
        .client
        .post(format!("{}/auth/login", ctx.storefront_url))
        .json(&json!({ "email": email, "password": PASSWORD }))
        .send()
        .await
        .expect("login request");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Wrong password after verification is a 401.
    let email2 = unique_email("auth");
    let _ = register_and_verify(&mut ctx, &email2).await;
    let resp = ctx
        .client
        .post(format!("{}/auth/login", ctx.storefront_url))
        .json(&json!({ "email": email2, "password": "not-the-password" }))
        .send()
        .await
        .expect("login request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server, database, Redis, and SMTP"]
async fn test_wrong_otp_rejected() {
    let mut ctx = TestContext::new();
    let email = unique_email("auth");
    let code = register(&mut ctx, &email).await;

    // Off-by-one guarantees a mismatch while staying six digits.
    let wrong = if code == "000000" { "000001" } else { "000000" };
    let resp = ctx
        .client
        .post(format!("{}/auth/verify-otp", ctx.storefront_url))
        .json(&json!({ "email": email, "verification_code": wrong }))
        .send()
        .await
        .expect("verify request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server, database, Redis, and SMTP"]
async fn test_logout_blacklists_tokens() {
    let mut ctx = TestContext::new();
    let email = unique_email("auth");
    let (access, refresh) = register_and_verify(&mut ctx, &email).await;

    let resp = ctx
        .client
        .post(format!("{}/auth/logout", ctx.storefront_url))
        .bearer_auth(&access)
        .json(&json!({ "refresh_token": refresh }))
        .send()
        .await
        .expect("logout request");
    assert_eq!(resp.status(), StatusCode::OK);

    // The access token is dead.
    let resp = ctx
        .client
        .get(format!("{}/account", ctx.storefront_url))
        .bearer_auth(&access)
        .send()
        .await
        .expect("account request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // So is the refresh token.
    let resp = ctx
        .client
        .post(format!("{}/auth/refresh", ctx.storefront_url))
        .json(&json!({ "refresh_token": refresh }))
        .send()
        .await
        .expect("refresh request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server, database, Redis, and SMTP"]
async fn test_refresh_issues_new_access_token() {
    let mut ctx = TestContext::new();
    let email = unique_email("auth");
    let (_access, refresh) = register_and_verify(&mut ctx, &email).await;

    let resp = ctx
        .client
        .post(format!("{}/auth/refresh", ctx.storefront_url))
        .json(&json!({ "refresh_token": refresh }))
        .send()
        .await
        .expect("refresh request");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("refresh body");
    let new_access = body["access_token"].as_str().expect("access token");

    let resp = ctx
        .client
        .get(format!("{}/account", ctx.storefront_url))
        .bearer_auth(new_access)
        .send()
        .await
        .expect("account request");
    assert_eq!(resp.status(), StatusCode::OK);
}
