//! Cross-cutting behaviour: health, JSON API, headers, sign-in and the role guard.

use axum::http::StatusCode;
use serde_json::json;
use wakalni_integration_tests::{TestApp, test_config};
use wakalni_web::config::WakalniConfig;
use wakalni_web::routes::api::chat::CANNED_REPLIES;

fn guarded() -> TestApp {
    TestApp::with_config(WakalniConfig {
        enforce_role_routes: true,
        ..test_config()
    })
}

async fn sign_in(app: &mut TestApp, email: &str, role: &str) -> Option<String> {
    let response = app
        .post_form(
            "/auth/login",
            &[("email", email), ("password", "secret"), ("type", role)],
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    response.location().map(str::to_owned)
}

#[tokio::test]
async fn test_health() {
    let mut app = TestApp::new();
    let response = app.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "ok");
}

#[tokio::test]
async fn test_security_headers_and_request_id() {
    let mut app = TestApp::new();
    let response = app.get("/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers["x-frame-options"], "DENY");
    assert_eq!(response.headers["x-content-type-options"], "nosniff");
    assert!(response.headers.contains_key("content-security-policy"));
    assert!(!response.headers.contains_key("strict-transport-security"));
    assert!(response.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_static_assets_are_served() {
    let mut app = TestApp::new();
    assert_eq!(app.get("/static/css/main.css").await.status, StatusCode::OK);
    assert_eq!(app.get("/static/js/app.js").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_chat_replies_from_canned_list() {
    let mut app = TestApp::new();
    let response = app
        .post_json("/api/chat", &json!({ "message": "Vous livrez à Oran ?" }))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let reply = response.json()["reply"].as_str().map(str::to_owned);
    assert!(reply.is_some_and(|r| CANNED_REPLIES.contains(&r.as_str())));

    let blank = app.post_json("/api/chat", &json!({ "message": "  " })).await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_promo_api_reports_rejections_in_body() {
    let mut app = TestApp::new();
    let valid = app
        .post_json(
            "/api/promotions/validate",
            &json!({ "code": "WELCOME20", "orderAmount": 2000 }),
        )
        .await;
    assert_eq!(valid.status, StatusCode::OK);
    assert_eq!(valid.json()["valid"], json!(true));
    assert_eq!(valid.json()["discount"], json!(400.0));

    let small = app
        .post_json(
            "/api/promotions/validate",
            &json!({ "code": "WELCOME20", "orderAmount": 500 }),
        )
        .await;
    assert_eq!(small.status, StatusCode::OK);
    assert_eq!(small.json()["valid"], json!(false));
    assert!(small.json()["error"].is_string());
}

#[tokio::test]
async fn test_out_of_range_amounts_are_refused() {
    let huge = "70000000000000000000000000000";
    let mut app = TestApp::new();

    let promo = app
        .post_json(
            "/api/promotions/validate",
            &json!({ "code": "WELCOME20", "orderAmount": huge }),
        )
        .await;
    assert_eq!(promo.status, StatusCode::OK);
    assert_eq!(promo.json()["valid"], json!(false));
    assert!(promo.json()["error"].is_string());

    for _ in 0..2 {
        let top_up = app
            .post_form("/profile/wallet/top-up", &[("amount", huge), ("method", "CCP")])
            .await;
        assert_eq!(top_up.status, StatusCode::BAD_REQUEST);
    }
    for _ in 0..2 {
        let top_up = app
            .post_form(
                "/profile/wallet/top-up",
                &[("amount", "1000000000"), ("method", "CCP")],
            )
            .await;
        assert_eq!(top_up.status, StatusCode::SEE_OTHER);
    }
    assert_eq!(app.get("/profile").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_invalid_login_is_rerendered() {
    let mut app = TestApp::new();
    let response = app
        .post_form("/auth/login", &[("email", "not-an-email"), ("password", "")])
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Email invalide"));
    assert!(response.body.contains("Mot de passe requis"));
}

#[tokio::test]
async fn test_simulated_sign_in_and_logout() {
    let mut app = TestApp::new();
    let home = sign_in(&mut app, "amina@example.dz", "user").await;
    assert_eq!(home.as_deref(), Some("/recipes"));

    let page = app.get("/recipes").await;
    assert!(page.body.contains("Welcome, amina"));
    assert!(page.body.contains("Sign out"));

    let response = app.post_form("/auth/logout", &[]).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));
    assert!(app.get("/").await.body.contains("Sign in"));
}

#[tokio::test]
async fn test_role_guard_sends_anonymous_to_login() {
    let mut app = guarded();
    let response = app.get("/admin/dashboard").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/auth/login"));

    // Checkout stays open to guests
    assert_eq!(app.get("/checkout").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_role_guard_keeps_users_in_their_area() {
    let mut app = guarded();
    let home = sign_in(&mut app, "amina@example.dz", "user").await;
    assert_eq!(home.as_deref(), Some("/recipes"));

    assert_eq!(app.get("/recipes").await.status, StatusCode::OK);
    let response = app.get("/admin/dashboard").await;
    assert_eq!(response.location(), Some("/recipes"));
    let response = app.get("/superadmin/dashboard").await;
    assert_eq!(response.location(), Some("/recipes"));
}

#[tokio::test]
async fn test_role_guard_admits_admin_to_dashboard() {
    let mut app = guarded();
    let home = sign_in(&mut app, "chef@pizzapalace.dz", "admin").await;
    assert_eq!(home.as_deref(), Some("/admin/dashboard"));

    assert_eq!(app.get("/admin/dashboard").await.status, StatusCode::OK);
    let response = app.get("/recipes").await;
    assert_eq!(response.location(), Some("/admin/dashboard"));
}
