//! Shared harness for HTTP integration tests.
//!
//! Builds the production router (same middleware stack as `main.rs`) over
//! the per-test database handed out by `#[sqlx::test]`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::routing::post;
use axum::{Json, Router};
use http_body_util::BodyExt;
use iguana_api::auth::jwt::{generate_access_token, JwtConfig};
use iguana_api::auth::password::hash_password;
use iguana_api::config::ServerConfig;
use iguana_api::router::build_app_router;
use iguana_api::state::AppState;
use iguana_api::stripe::{StripeClient, StripeConfig};
use iguana_core::roles::UserRole;
use iguana_db::models::sport::{CreateSportCategory, SportCategory};
use iguana_db::models::user::{CreateUser, User};
use iguana_db::repositories::{SportRepo, UserRepo};
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "test_password_123!";
pub const WEBHOOK_SECRET: &str = "whsec_test_secret";

/// Nothing listens here; checkout calls fail fast with a connection error.
const UNREACHABLE_STRIPE: &str = "http://127.0.0.1:9";

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

pub fn test_config(stripe_api_base: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
        stripe: StripeConfig {
            secret_key: "sk_test_123".to_string(),
            webhook_secret: WEBHOOK_SECRET.to_string(),
            api_base: stripe_api_base.to_string(),
            success_url: "http://localhost:5173/payment/success".to_string(),
            cancel_url: "http://localhost:5173/payment/cancelled".to_string(),
            signature_tolerance_secs: 300,
        },
    }
}

/// Full application router with a Stripe client that cannot connect.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_stripe(pool, UNREACHABLE_STRIPE)
}

pub fn build_test_app_with_stripe(pool: PgPool, stripe_api_base: &str) -> Router {
    let config = test_config(stripe_api_base);
    let state = AppState {
        pool,
        stripe: Arc::new(StripeClient::new(&config.stripe)),
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Start a local stand-in for `POST /v1/checkout/sessions` and return its base URL.
pub async fn spawn_stripe_stub(session_id: &'static str) -> String {
    let app = Router::new().route(
        "/v1/checkout/sessions",
        post(move || async move {
            Json(serde_json::json!({
                "id": session_id,
                "object": "checkout.session",
                "url": format!("https://checkout.stripe.test/pay/{session_id}"),
            }))
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });
    format!("http://{addr}")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a user whose password is [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, email: &str, role: UserRole, sports: &[&str]) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            display_name: email.split('@').next().unwrap_or(email).to_string(),
            password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
            role,
            sports: sports.iter().map(|s| s.to_string()).collect(),
        },
    )
    .await
    .expect("user creation should succeed")
}

pub async fn create_category(
    pool: &PgPool,
    key_name: &str,
    free_levels_count: i32,
) -> SportCategory {
    SportRepo::create_category(
        pool,
        &CreateSportCategory {
            name: key_name.replace('_', " "),
            key_name: key_name.to_string(),
            description: None,
            is_published: true,
            free_levels_count,
            price_usd: 4999,
            price_pln: 19900,
        },
    )
    .await
    .expect("category creation should succeed")
}

/// Access token for `user`, signed with the test secret.
pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &user.role, &test_config(UNREACHABLE_STRIPE).jwt)
        .expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should complete")
}

fn request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("request should build"),
        None => builder.body(Body::empty()).expect("request should build"),
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, request(Method::GET, uri, None, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request(Method::GET, uri, Some(token), None)).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, request(Method::POST, uri, None, Some(body))).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, request(Method::POST, uri, Some(token), Some(body))).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, request(Method::PUT, uri, Some(token), Some(body))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request(Method::DELETE, uri, Some(token), None)).await
}

/// POST a raw body with a `Stripe-Signature` header.
pub async fn post_webhook(app: Router, payload: &str, signature: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/webhooks/stripe")
        .header("content-type", "application/json")
        .header("stripe-signature", signature)
        .body(Body::from(payload.to_string()))
        .expect("request should build");
    send(app, request).await
}
