//! HTTP-level tests for login and the caller's profile.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json, put_json_auth, token_for, TEST_PASSWORD};
use iguana_core::roles::UserRole;
use iguana_db::repositories::UserRepo;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_returns_token_and_profile(pool: PgPool) {
    let user = common::create_user(&pool, "Trener@Iguana.test", UserRole::Trainer, &[]).await;
    let app = common::build_test_app(pool);

    let body = json!({ "email": "trener@iguana.test", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_eq!(json["expires_in"], 15 * 60);
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["role"], "trainer");
    assert_eq!(json["user"]["badge"]["label"], "Trener");
    assert_eq!(json["user"]["badge"]["color"], "blue");
    assert!(json["user"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_with_wrong_password_is_unauthorized(pool: PgPool) {
    common::create_user(&pool, "ola@iguana.test", UserRole::Free, &[]).await;
    let app = common::build_test_app(pool);

    let body = json!({ "email": "ola@iguana.test", "password": "not-the-password" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_rejects_malformed_email(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({ "email": "not-an-email", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deactivated_account_cannot_log_in(pool: PgPool) {
    let user = common::create_user(&pool, "gone@iguana.test", UserRole::Free, &[]).await;
    UserRepo::deactivate(&pool, user.id).await.unwrap();
    let app = common::build_test_app(pool);

    let body = json!({ "email": "gone@iguana.test", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn me_returns_profile_with_badge(pool: PgPool) {
    let user =
        common::create_user(&pool, "ania@iguana.test", UserRole::Free, &["pole_dance"]).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/auth/me", &token_for(&user)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["email"], "ania@iguana.test");
    assert_eq!(json["data"]["badge"]["label"], "Darmowy");
    assert_eq!(json["data"]["sports"], json!(["pole_dance"]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_sports_accepts_known_keys_and_dedupes(pool: PgPool) {
    common::create_category(&pool, "pole_dance", 2).await;
    common::create_category(&pool, "aerial_hoop", 2).await;
    let user = common::create_user(&pool, "kasia@iguana.test", UserRole::Free, &[]).await;
    let token = token_for(&user);
    let app = common::build_test_app(pool);

    let body = json!({ "sports": ["pole_dance", " aerial_hoop ", "pole_dance"] });
    let response = put_json_auth(app.clone(), "/api/v1/auth/me/sports", body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["data"]["sports"],
        json!(["pole_dance", "aerial_hoop"])
    );

    let body = json!({ "sports": ["underwater_hockey"] });
    let response = put_json_auth(app, "/api/v1/auth/me/sports", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
