//! Integration tests for the core flow: cart -> order -> return -> wallet.
//!
//! Requires running servers, a migrated database with the demo catalog
//! seeded, and Redis. Run with `-- --ignored`.

use furnspace_integration_tests::{TestContext, unique_email};
use reqwest::StatusCode;
use serde_json::{Value, json};

const PASSWORD: &str = "integration-pass-1";

/// Register, verify, and return an access token.
async fn signup(ctx: &mut TestContext) -> String {
    let email = unique_email("checkout");

    let resp = ctx
        .client
        .post(format!("{}/auth/register", ctx.storefront_url))
        .json(&json!({
            "first_name": "Checkout",
            "last_name": "Tester",
            "email": email,
            "password": PASSWORD,
        }))
        .send()
        .await
        .expect("register request");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let code = ctx.verification_code_for(&email).await;
    let resp = ctx
        .client
        .post(format!("{}/auth/verify-otp", ctx.storefront_url))
        .json(&json!({ "email": email, "verification_code": code }))
        .send()
        .await
        .expect("verify request");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("verify body");
    body["access_token"].as_str().expect("access token").to_string()
}

/// First product ID from the public catalog.
async fn any_product_id(ctx: &TestContext, access: &str) -> i64 {
    let resp = ctx
        .client
        .get(format!("{}/products", ctx.storefront_url))
        .bearer_auth(access)
        .send()
        .await
        .expect("products request");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("products body");
    body["products"][0]["id"]
        .as_i64()
        .expect("a seeded product (run `furnspace seed`)")
}

/// Add a product and place a card order; returns the order JSON.
async fn place_order(ctx: &mut TestContext, access: &str) -> Value {
    let product_id = any_product_id(ctx, access).await;

    let resp = ctx
        .client
        .post(format!("{}/cart/add", ctx.storefront_url))
        .bearer_auth(access)
        .json(&json!({ "product_id": product_id, "quantity": 2 }))
        .send()
        .await
        .expect("cart add request");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = ctx
        .client
        .post(format!("{}/checkout", ctx.storefront_url))
        .bearer_auth(access)
        .json(&json!({
            "payment_info": {
                "payment_method": "card",
                "cardholder_name": "Checkout Tester",
                "card_number": "4242 4242 4242 4242",
            },
            "shipping_info": {
                "address": "12 Elm St",
                "city": "Oakland",
                "state": "CA",
                "country": "US",
                "zip_code": "94016",
            },
        }))
        .send()
        .await
        .expect("checkout request");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("checkout body");
    body["order"].clone()
}

#[tokio::test]
#[ignore = "Requires running servers, seeded database, Redis, and SMTP"]
async fn test_checkout_snapshots_cart_and_clears_it() {
    let mut ctx = TestContext::new();
    let access = signup(&mut ctx).await;

    let order = place_order(&mut ctx, &access).await;

    // The order carries a prefixed code and snapshot items.
    let code = order["code"].as_str().expect("order code");
    assert!(code.starts_with("ORD-"));
    assert_eq!(order["items"].as_array().expect("items").len(), 1);
    assert_eq!(order["items"][0]["quantity"], 2);
    assert_eq!(order["status"], "pending");
    assert_eq!(order["payment_status"], "paid");
    // Card data is masked.
    assert_eq!(order["payment"]["card_last4"], "4242");

    // The cart is now empty.
    let resp = ctx
        .client
        .get(format!("{}/cart", ctx.storefront_url))
        .bearer_auth(&access)
        .send()
        .await
        .expect("cart request");
    let body: Value = resp.json().await.expect("cart body");
    assert_eq!(body["item_count"], 0);
}

#[tokio::test]
#[ignore = "Requires running servers, seeded database, Redis, and SMTP"]
async fn test_checkout_with_empty_cart_rejected() {
    let mut ctx = TestContext::new();
    let access = signup(&mut ctx).await;

    let resp = ctx
        .client
        .post(format!("{}/checkout", ctx.storefront_url))
        .bearer_auth(&access)
        .json(&json!({
            "payment_info": { "payment_method": "cod" },
            "shipping_info": {
                "address": "12 Elm St",
                "city": "Oakland",
                "state": "CA",
                "country": "US",
                "zip_code": "94016",
            },
        }))
        .send()
        .await
        .expect("checkout request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running servers, seeded database, Redis, and SMTP"]
async fn test_cancel_only_before_shipping_and_only_once() {
    let mut ctx = TestContext::new();
    let access = signup(&mut ctx).await;
    let order = place_order(&mut ctx, &access).await;
    let order_id = order["id"].as_i64().expect("order id");

    // Pending orders cancel fine.
    let resp = ctx
        .client
        .post(format!("{}/orders/{order_id}/cancel", ctx.storefront_url))
        .bearer_auth(&access)
        .json(&json!({ "reason": "changed my mind" }))
        .send()
        .await
        .expect("cancel request");
    assert_eq!(resp.status(), StatusCode::OK);

    // A second cancellation is rejected by the status guard.
    let resp = ctx
        .client
        .post(format!("{}/orders/{order_id}/cancel", ctx.storefront_url))
        .bearer_auth(&access)
        .json(&json!({ "reason": "again" }))
        .send()
        .await
        .expect("cancel request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Shipped orders cannot be cancelled at all.
    let order = place_order(&mut ctx, &access).await;
    let order_id = order["id"].as_i64().expect("order id");
    ctx.force_order_status(order_id, "shipped").await;

    let resp = ctx
        .client
        .post(format!("{}/orders/{order_id}/cancel", ctx.storefront_url))
        .bearer_auth(&access)
        .json(&json!({ "reason": "too late" }))
        .send()
        .await
        .expect("cancel request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running servers, seeded database, Redis, and SMTP"]
async fn test_return_credits_wallet_exactly_once() {
    let mut ctx = TestContext::new();
    let access = signup(&mut ctx).await;
    let order = place_order(&mut ctx, &access).await;
    let order_id = order["id"].as_i64().expect("order id");
    let total = order["total"].as_str().expect("total").to_string();

    // Returns are rejected until the order is delivered.
    let resp = ctx
        .client
        .post(format!("{}/orders/{order_id}/return", ctx.storefront_url))
        .bearer_auth(&access)
        .json(&json!({ "reason": "wrong color" }))
        .send()
        .await
        .expect("return request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    ctx.force_order_status(order_id, "delivered").await;

    // Delivered + paid: the return refunds the full total to the wallet.
    let resp = ctx
        .client
        .post(format!("{}/orders/{order_id}/return", ctx.storefront_url))
        .bearer_auth(&access)
        .json(&json!({ "reason": "wrong color" }))
        .send()
        .await
        .expect("return request");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("return body");
    assert_eq!(body["order"]["status"], "returned");
    assert_eq!(body["order"]["payment_status"], "refunded");
    assert_eq!(body["wallet"]["balance"], total.as_str());

    // Replaying the return must not double-credit.
    let resp = ctx
        .client
        .post(format!("{}/orders/{order_id}/return", ctx.storefront_url))
        .bearer_auth(&access)
        .json(&json!({ "reason": "wrong color" }))
        .send()
        .await
        .expect("return request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = ctx
        .client
        .get(format!("{}/wallet", ctx.storefront_url))
        .bearer_auth(&access)
        .send()
        .await
        .expect("wallet request");
    let body: Value = resp.json().await.expect("wallet body");
    assert_eq!(body["balance"], total.as_str());
    assert_eq!(body["transactions"].as_array().expect("ledger").len(), 1);
}

#[tokio::test]
#[ignore = "Requires running servers, seeded database, Redis, and SMTP"]
async fn test_orders_are_scoped_to_their_owner() {
    let mut ctx = TestContext::new();
    let owner = signup(&mut ctx).await;
    let order = place_order(&mut ctx, &owner).await;
    let order_id = order["id"].as_i64().expect("order id");

    let stranger = signup(&mut ctx).await;
    let resp = ctx
        .client
        .get(format!("{}/orders/{order_id}", ctx.storefront_url))
        .bearer_auth(&stranger)
        .send()
        .await
        .expect("order request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
