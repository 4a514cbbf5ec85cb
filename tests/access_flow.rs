//! Generation gate and admin operations through the full router.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::TestApp;
use serde_json::json;
use std::sync::atomic::Ordering;

#[tokio::test]
async fn test_new_user_cannot_generate_until_enabled() {
    let app = TestApp::new();
    let token = app.signup("bob", "pw").await;

    let (status, body) = app.generate(&token, "An article.").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "User not enabled");
    assert_eq!(app.generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_enabled_user_generates_and_is_logged() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    let token = app.signup("bob", "pw").await;

    let (status, body) = app
        .post(
            "/admin/enable-user",
            Some(&admin),
            json!({ "username": "bob", "expires_in": 60 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("User bob enabled until "));

    let (status, body) = app.generate(&token, "An article.").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["post"].as_str().unwrap().starts_with("generated post"));

    let (status, stats) = app.get("/admin/request-stats", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    let entries = stats.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["username"], "bob");
    assert!(entries[0]["timestamp"].is_string());
}

#[tokio::test]
async fn test_rate_limit_blocks_second_call() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    let token = app.signup("alice", "pw").await;

    app.post(
        "/admin/enable-user",
        Some(&admin),
        json!({ "username": "alice" }),
    )
    .await;
    let (status, _) = app
        .post("/admin/update-rate-limit", Some(&admin), json!({ "rate_limit": 2 }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (first, _) = app.generate(&token, "One.").await;
    let (second, body) = app.generate(&token, "Two.").await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], "Rate limit exceeded (max 2 req/min)");
    assert_eq!(app.generator.calls.load(Ordering::SeqCst), 1);
    assert_eq!(app.state.ledger.len(), 1);
}

#[tokio::test]
async fn test_provider_failure_not_logged() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    let token = app.signup("bob", "pw").await;
    app.post("/admin/enable-user", Some(&admin), json!({ "username": "bob" }))
        .await;
    app.generator.fail.store(true, Ordering::SeqCst);

    let (status, body) = app.generate(&token, "An article.").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to generate post");
    assert!(app.state.ledger.is_empty());
}

#[tokio::test]
async fn test_invalid_article_rejected_without_admission() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    let token = app.signup("bob", "pw").await;
    app.post("/admin/enable-user", Some(&admin), json!({ "username": "bob" }))
        .await;

    let (status, _) = app
        .post("/generate-post", Some(&token), json!({ "text": "wrong field" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.generate(&token, "   ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Still admitted: the rejected bodies never reached the limiter
    let (status, _) = app.generate(&token, "A real article.").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.state.ledger.len(), 1);
}

#[tokio::test]
async fn test_expired_access_denied_with_valid_token() {
    let app = TestApp::new();
    let token = app.signup("bob", "pw").await;
    app.state
        .users
        .enable_user("bob", Utc::now() - Duration::seconds(1));

    let (status, body) = app.generate(&token, "An article.").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "User access expired");
}

#[tokio::test]
async fn test_user_token_refused_on_every_admin_route() {
    let app = TestApp::new();
    let token = app.signup("bob", "pw").await;

    for uri in ["/admin/list-users", "/admin/request-stats"] {
        let (status, body) = app.get(uri, Some(&token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(body["error"], "Admin access required");
    }

    for (uri, payload) in [
        ("/admin/enable-user", json!({ "username": "bob" })),
        ("/admin/update-expiration", json!({ "username": "bob" })),
        ("/admin/update-rate-limit", json!({ "rate_limit": 100 })),
    ] {
        let (status, _) = app.post(uri, Some(&token), payload).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
    }

    // Nothing changed
    assert!(!app.state.users.get_user_by_username("bob").unwrap().allowed);
    assert_eq!(app.state.rate_limit.get().get(), 1);
}

#[tokio::test]
async fn test_list_users() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    app.signup("bob", "pw").await;

    let (status, body) = app.get("/admin/list-users", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);

    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["username"], "admin");
    assert_eq!(users[0]["role"], "admin");
    assert_eq!(users[0]["allowed"], true);
    assert!(users[0]["access_expiresAt"].as_str().unwrap().ends_with("UTC"));
    assert_eq!(users[1]["username"], "bob");
    assert_eq!(users[1]["allowed"], false);
    assert!(users[1]["access_expiresAt"].is_null());
    assert!(users[1].get("password_hash").is_none());
}

#[tokio::test]
async fn test_admin_ops_on_unknown_user_not_found() {
    let app = TestApp::new();
    let admin = app.admin_token().await;

    for uri in ["/admin/enable-user", "/admin/update-expiration"] {
        let (status, body) = app
            .post(uri, Some(&admin), json!({ "username": "ghost", "expires_in": 5 }))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["error"], "User not found");
    }
}

#[tokio::test]
async fn test_update_expiration_keeps_enabled_flag() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    app.signup("bob", "pw").await;

    let (status, body) = app
        .post(
            "/admin/update-expiration",
            Some(&admin),
            json!({ "username": "bob", "expires_in": 30 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("User bob expiration updated until "));

    let bob = app.state.users.get_user_by_username("bob").unwrap();
    assert!(!bob.allowed);
    let expires_at = bob.access_expires_at.unwrap();
    assert!(expires_at > Utc::now() + Duration::minutes(29));
    assert!(expires_at <= Utc::now() + Duration::minutes(30));
}

#[tokio::test]
async fn test_enable_defaults_to_seven_days() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    app.signup("bob", "pw").await;

    app.post(
        "/admin/enable-user",
        Some(&admin),
        json!({ "username": "bob", "expires_in": 0 }),
    )
    .await;

    let expires_at = app
        .state
        .users
        .get_user_by_username("bob")
        .unwrap()
        .access_expires_at
        .unwrap();
    assert!(expires_at > Utc::now() + Duration::days(6));
    assert!(expires_at <= Utc::now() + Duration::days(7));
}

#[tokio::test]
async fn test_update_rate_limit_rejects_non_positive() {
    let app = TestApp::new();
    let admin = app.admin_token().await;

    for bad in [json!({ "rate_limit": 0 }), json!({ "rate_limit": -3 }), json!({})] {
        let (status, body) = app
            .post("/admin/update-rate-limit", Some(&admin), bad)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid rate_limit value");
    }

    assert_eq!(app.state.rate_limit.get().get(), 1);

    let (status, body) = app
        .post("/admin/update-rate-limit", Some(&admin), json!({ "rate_limit": 10 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Rate limit updated to 10 req/min");
    assert_eq!(app.state.rate_limit.get().get(), 10);
}
