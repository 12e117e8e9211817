//! HTTP surface tests: routing, the auth gate, and the response
//! envelope, driven through the full middleware stack.

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use drape::auth::JwtConfig;
use drape::core::{Config, Server, ServerState};
use drape::db;
use drape::orders::ZeroStockPolicy;

async fn test_app(dir: &tempfile::TempDir) -> Router {
    let work_dir = dir.path().to_string_lossy().to_string();
    let config = Config {
        work_dir: work_dir.clone(),
        http_port: 0,
        db_path: format!("{work_dir}/db"),
        environment: "development".into(),
        jwt: JwtConfig::default(),
        request_timeout_ms: 30000,
        zero_stock_policy: ZeroStockPolicy::Remove,
        google_client_id: String::new(),
        smtp: None,
    };
    let db = db::init_mem_db().await.unwrap();
    Server::build_app(ServerState::with_db(&config, db))
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn put_json_with_token(uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn health_and_catalog_are_public() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir).await;

    let (status, body) = send(&app, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");

    let (status, body) = send(&app, get("/api/products")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "E0000");
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn protected_routes_reject_missing_and_garbage_tokens() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir).await;

    let (status, body) = send(&app, get("/api/cart")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "E3001");

    let (status, _) = send(&app, get_with_token("/api/orders", "not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_verify_login_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir).await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/auth/register",
            json!({
                "name": "Ada",
                "email": "Ada@Example.com",
                "password": "s3cret-pass"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "ada@example.com");
    // Development mode echoes the code instead of relying on SMTP
    let otp = body["data"]["otp"].as_str().unwrap().to_string();
    assert_eq!(otp.len(), 6);

    // Unverified accounts cannot log in yet
    let (status, _) = send(
        &app,
        post_json(
            "/api/auth/login",
            json!({"email": "ada@example.com", "password": "s3cret-pass"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        post_json(
            "/api/auth/verify-otp",
            json!({"email": "ada@example.com", "otp": otp}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Wrong password after verification: still a 400, unified message
    let (status, body) = send(
        &app,
        post_json(
            "/api/auth/login",
            json!({"email": "ada@example.com", "password": "wrong-pass-here"}),
        ),
    )
    .await;
    assert_ne!(status, StatusCode::OK);
    assert!(body["data"].is_null());

    let (status, body) = send(
        &app,
        post_json(
            "/api/auth/login",
            json!({"email": "ada@example.com", "password": "s3cret-pass"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["user"]["email"], "ada@example.com");

    let (status, body) = send(&app, get_with_token("/api/auth/me", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Ada");
}

#[tokio::test]
async fn duplicate_registration_of_a_verified_account_conflicts() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir).await;

    let register = || {
        post_json(
            "/api/auth/register",
            json!({
                "name": "Ada",
                "email": "ada@example.com",
                "password": "s3cret-pass"
            }),
        )
    };

    let (_, body) = send(&app, register()).await;
    let otp = body["data"]["otp"].as_str().unwrap().to_string();

    // Re-registering while unverified just refreshes the code
    let (status, _) = send(&app, register()).await;
    assert_eq!(status, StatusCode::OK);

    // The first code was replaced by the resend
    let (status, _) = send(
        &app,
        post_json(
            "/api/auth/verify-otp",
            json!({"email": "ada@example.com", "otp": otp}),
        ),
    )
    .await;
    assert_ne!(status, StatusCode::OK);
}

#[tokio::test]
async fn admin_catalog_writes_require_a_token() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir).await;

    let (status, _) = send(
        &app,
        post_json("/api/categories", json!({"name": "Men", "image": null})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_order_status_names_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir).await;

    let (_, body) = send(
        &app,
        post_json(
            "/api/auth/register",
            json!({
                "name": "Ada",
                "email": "ada@example.com",
                "password": "s3cret-pass"
            }),
        ),
    )
    .await;
    let otp = body["data"]["otp"].as_str().unwrap().to_string();
    send(
        &app,
        post_json(
            "/api/auth/verify-otp",
            json!({"email": "ada@example.com", "otp": otp}),
        ),
    )
    .await;
    let (_, body) = send(
        &app,
        post_json(
            "/api/auth/login",
            json!({"email": "ada@example.com", "password": "s3cret-pass"}),
        ),
    )
    .await;
    let token = body["data"]["token"].as_str().unwrap().to_string();

    // Status parsing happens before the order is even looked up
    let (status, body) = send(
        &app,
        put_json_with_token(
            "/api/orders/order:missing/status",
            &token,
            json!({"status": "RETURN_PLACED"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E4003");
    assert!(body["message"].as_str().unwrap().contains("RETURN_PLACED"));
}

#[tokio::test]
async fn validation_failures_use_the_envelope() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir).await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/auth/register",
            json!({"name": "Ada", "email": "not-an-email", "password": "s3cret-pass"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");
    assert!(body["message"].as_str().unwrap().contains("email"));
}
