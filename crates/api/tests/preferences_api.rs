//! HTTP-level tests for per-user preferences.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, put_json_auth, token_for};
use iguana_core::roles::UserRole;
use serde_json::json;
use sqlx::PgPool;

const FILTERS: &str = "/api/v1/user/preferences/training_library_filters";

#[sqlx::test(migrations = "../../db/migrations")]
async fn filters_default_when_nothing_is_stored(pool: PgPool) {
    let user = common::create_user(&pool, "new@iguana.test", UserRole::Free, &[]).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, FILTERS, &token_for(&user)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["key"], "training_library_filters");
    assert_eq!(
        json["data"]["value"],
        json!({ "category": null, "difficulty": null, "search": "", "premium_only": false })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn filters_round_trip_and_clear(pool: PgPool) {
    let user = common::create_user(&pool, "saver@iguana.test", UserRole::Free, &[]).await;
    let token = token_for(&user);
    let app = common::build_test_app(pool);

    let body = json!({ "category": "pole_dance", "search": "spin" });
    let response = put_json_auth(app.clone(), FILTERS, body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["value"]["premium_only"], false);

    let json = body_json(get_auth(app.clone(), FILTERS, &token).await).await;
    assert_eq!(json["data"]["value"]["category"], "pole_dance");
    assert_eq!(json["data"]["value"]["search"], "spin");

    let response = delete_auth(app.clone(), FILTERS, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = body_json(get_auth(app, FILTERS, &token).await).await;
    assert_eq!(json["data"]["value"]["search"], "");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_filters_are_rejected(pool: PgPool) {
    let user = common::create_user(&pool, "bad@iguana.test", UserRole::Free, &[]).await;
    let app = common::build_test_app(pool);

    let body = json!({ "premium_only": "yes please" });
    let response = put_json_auth(app, FILTERS, body, &token_for(&user)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_key_is_rejected(pool: PgPool) {
    let user = common::create_user(&pool, "keys@iguana.test", UserRole::Free, &[]).await;
    let app = common::build_test_app(pool);

    let response =
        get_auth(app, "/api/v1/user/preferences/Feed-Filters", &token_for(&user)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn free_form_keys_store_raw_json(pool: PgPool) {
    let user = common::create_user(&pool, "free@iguana.test", UserRole::Free, &[]).await;
    let other = common::create_user(&pool, "other@iguana.test", UserRole::Free, &[]).await;
    let token = token_for(&user);
    let app = common::build_test_app(pool);
    let uri = "/api/v1/user/preferences/dashboard_layout";

    let response = get_auth(app.clone(), uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let layout = json!({ "columns": 2, "pinned": ["challenges"] });
    let response = put_json_auth(app.clone(), uri, layout.clone(), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get_auth(app.clone(), uri, &token).await).await;
    assert_eq!(json["data"]["value"], layout);

    // Another user's view of the same key is untouched.
    let response = get_auth(app, uri, &token_for(&other)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
