//! Integration tests for the admin API.
//!
//! Requires a running admin server and an admin account created via:
//! `furnspace admin create -e $ADMIN_TEST_EMAIL -n Tester -p $ADMIN_TEST_PASSWORD`
//! Run with `-- --ignored`.

use furnspace_integration_tests::TestContext;
use reqwest::StatusCode;
use serde_json::{Value, json};

/// Log in with the CLI-created test admin and return the token.
async fn admin_token(ctx: &TestContext) -> String {
    let email = std::env::var("ADMIN_TEST_EMAIL").expect("ADMIN_TEST_EMAIL must be set");
    let password = std::env::var("ADMIN_TEST_PASSWORD").expect("ADMIN_TEST_PASSWORD must be set");

    let resp = ctx
        .client
        .post(format!("{}/auth/login", ctx.admin_url))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("admin login request");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("login body");
    body["access_token"].as_str().expect("access token").to_string()
}

#[tokio::test]
#[ignore = "Requires running admin server, database, and a CLI-created admin"]
async fn test_admin_login_rejects_bad_credentials() {
    let ctx = TestContext::new();

    let resp = ctx
        .client
        .post(format!("{}/auth/login", ctx.admin_url))
        .json(&json!({ "email": "nobody@example.com", "password": "wrong" }))
        .send()
        .await
        .expect("admin login request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running admin server, database, and a CLI-created admin"]
async fn test_product_lifecycle() {
    let ctx = TestContext::new();
    let token = admin_token(&ctx).await;

    // Create.
    let resp = ctx
        .client
        .post(format!("{}/products", ctx.admin_url))
        .bearer_auth(&token)
        .json(&json!({
            "name": "Integration Test Stool",
            "description": "Three-legged test fixture.",
            "category_id": "seating",
            "price": "79.00",
            "stock": 5,
            "variants": [
                { "type": "color", "options": [{ "value": "natural" }] }
            ],
        }))
        .send()
        .await
        .expect("create product request");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = resp.json().await.expect("create body");
    let id = created["id"].as_i64().expect("product id");
    assert_eq!(created["variants"][0]["type"], "color");

    // Update.
    let resp = ctx
        .client
        .put(format!("{}/products/{id}", ctx.admin_url))
        .bearer_auth(&token)
        .json(&json!({ "sale_price": "59.00", "stock": 3 }))
        .send()
        .await
        .expect("update product request");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.expect("update body");
    assert_eq!(updated["sale_price"], "59.00");
    assert_eq!(updated["stock"], 3);
    // Untouched fields survive the patch.
    assert_eq!(updated["name"], "Integration Test Stool");

    // Soft delete.
    let resp = ctx
        .client
        .delete(format!("{}/products/{id}", ctx.admin_url))
        .bearer_auth(&token)
        .send()
        .await
        .expect("delete product request");
    assert_eq!(resp.status(), StatusCode::OK);

    // Still visible to admins, flagged inactive.
    let resp = ctx
        .client
        .get(format!("{}/products/{id}", ctx.admin_url))
        .bearer_auth(&token)
        .send()
        .await
        .expect("get product request");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("get body");
    assert_eq!(body["is_active"], false);
}

#[tokio::test]
#[ignore = "Requires running admin server, database, and a CLI-created admin"]
async fn test_order_status_validation() {
    let ctx = TestContext::new();
    let token = admin_token(&ctx).await;

    // An unknown status is rejected before any lookup.
    let resp = ctx
        .client
        .put(format!("{}/orders/999999/status", ctx.admin_url))
        .bearer_auth(&token)
        .json(&json!({ "status": "teleported" }))
        .send()
        .await
        .expect("status update request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // "returned" is reserved for the storefront return flow.
    let resp = ctx
        .client
        .put(format!("{}/orders/999999/status", ctx.admin_url))
        .bearer_auth(&token)
        .json(&json!({ "status": "returned" }))
        .send()
        .await
        .expect("status update request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running admin server, database, and a CLI-created admin"]
async fn test_admin_routes_require_token() {
    let ctx = TestContext::new();

    let resp = ctx
        .client
        .get(format!("{}/products", ctx.admin_url))
        .send()
        .await
        .expect("products request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = ctx
        .client
        .get(format!("{}/customers", ctx.admin_url))
        .send()
        .await
        .expect("customers request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
