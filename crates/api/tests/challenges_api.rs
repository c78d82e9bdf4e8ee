//! HTTP-level tests for joining challenges and the day-lock rules.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json_auth, put_json_auth, token_for};
use iguana_core::roles::UserRole;
use iguana_db::models::challenge::{Challenge, CreateChallenge};
use iguana_db::repositories::ChallengeRepo;
use serde_json::json;
use sqlx::PgPool;

async fn create_challenge(pool: &PgPool, title: &str, is_premium: bool, days: i32) -> Challenge {
    ChallengeRepo::create(
        pool,
        &CreateChallenge {
            title: title.to_string(),
            description: Some("Codzienna porcja rozciągania".into()),
            is_published: true,
            is_premium,
            duration_days: days,
            price_usd: if is_premium { 1999 } else { 0 },
            price_pln: if is_premium { 7900 } else { 0 },
        },
    )
    .await
    .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_marks_premium_challenges_without_access(pool: PgPool) {
    create_challenge(&pool, "Free stretch", false, 7).await;
    create_challenge(&pool, "Splits in 30 days", true, 30).await;
    let user = common::create_user(&pool, "list@iguana.test", UserRole::Free, &[]).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/challenges", &token_for(&user)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let challenges = json["data"].as_array().unwrap();
    assert_eq!(challenges.len(), 2);
    for challenge in challenges {
        let expected = challenge["is_premium"] == false;
        assert_eq!(challenge["has_access"], expected, "{challenge}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn joining_creates_a_run_with_day_one_open(pool: PgPool) {
    let challenge = create_challenge(&pool, "Core week", false, 3).await;
    let user = common::create_user(&pool, "join@iguana.test", UserRole::Free, &[]).await;
    let token = token_for(&user);
    let app = common::build_test_app(pool);

    let uri = format!("/api/v1/challenges/{}/join", challenge.id);
    let response = post_json_auth(app.clone(), &uri, json!({}), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["challenge_id"], challenge.id);
    assert_eq!(json["data"]["user_id"], user.id);

    let response = post_json_auth(app.clone(), &uri, json!({}), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let uri = format!("/api/v1/challenges/{}/days", challenge.id);
    let json = body_json(get_auth(app, &uri, &token).await).await;
    let days = json["data"]["days"].as_array().unwrap();
    assert_eq!(days.len(), 3);
    assert_eq!(days[0]["is_locked"], false);
    assert_eq!(days[1]["is_locked"], true);
    assert_eq!(json["data"]["current_day"], 1);
    assert_eq!(json["data"]["progress"]["pending"], 3);
    assert_eq!(json["data"]["progress"]["total"], 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn tomorrow_stays_locked_after_completing_today(pool: PgPool) {
    let challenge = create_challenge(&pool, "Core week", false, 3).await;
    let user = common::create_user(&pool, "daily@iguana.test", UserRole::Free, &[]).await;
    let token = token_for(&user);
    let app = common::build_test_app(pool);

    let join = format!("/api/v1/challenges/{}/join", challenge.id);
    post_json_auth(app.clone(), &join, json!({}), &token).await;

    let day1 = format!("/api/v1/challenges/{}/days/1", challenge.id);
    let response =
        put_json_auth(app.clone(), &day1, json!({ "status": "completed" }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "completed");
    assert!(json["data"]["completed_at"].is_string());

    // Day 2 is scheduled for tomorrow, so it is still locked.
    let day2 = format!("/api/v1/challenges/{}/days/2", challenge.id);
    let response = put_json_auth(app.clone(), &day2, json!({ "status": "rest" }), &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let uri = format!("/api/v1/challenges/{}/days", challenge.id);
    let json = body_json(get_auth(app, &uri, &token).await).await;
    assert_eq!(json["data"]["days"][1]["is_locked"], true);
    assert_eq!(json["data"]["current_day"], json!(null));
    assert_eq!(json["data"]["progress"]["completed"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admins_can_update_any_day(pool: PgPool) {
    let challenge = create_challenge(&pool, "Core week", false, 3).await;
    let admin = common::create_user(&pool, "admin@iguana.test", UserRole::Admin, &[]).await;
    let token = token_for(&admin);
    let app = common::build_test_app(pool);

    let join = format!("/api/v1/challenges/{}/join", challenge.id);
    post_json_auth(app.clone(), &join, json!({}), &token).await;

    let day3 = format!("/api/v1/challenges/{}/days/3", challenge.id);
    let response = put_json_auth(app, &day3, json!({ "status": "completed" }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_status_and_unknown_day_are_rejected(pool: PgPool) {
    let challenge = create_challenge(&pool, "Core week", false, 3).await;
    let user = common::create_user(&pool, "typo@iguana.test", UserRole::Free, &[]).await;
    let token = token_for(&user);
    let app = common::build_test_app(pool);

    let join = format!("/api/v1/challenges/{}/join", challenge.id);
    post_json_auth(app.clone(), &join, json!({}), &token).await;

    let day1 = format!("/api/v1/challenges/{}/days/1", challenge.id);
    let response = put_json_auth(app.clone(), &day1, json!({ "status": "skipped" }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let day9 = format!("/api/v1/challenges/{}/days/9", challenge.id);
    let response = put_json_auth(app, &day9, json!({ "status": "completed" }), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn days_of_an_unjoined_challenge_return_404(pool: PgPool) {
    let challenge = create_challenge(&pool, "Core week", false, 3).await;
    let user = common::create_user(&pool, "lurker@iguana.test", UserRole::Free, &[]).await;
    let app = common::build_test_app(pool);

    let uri = format!("/api/v1/challenges/{}/days", challenge.id);
    let response = get_auth(app, &uri, &token_for(&user)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn premium_challenge_requires_purchase_or_role(pool: PgPool) {
    let challenge = create_challenge(&pool, "Splits in 30 days", true, 30).await;
    let free = common::create_user(&pool, "free@iguana.test", UserRole::Free, &[]).await;
    let trainer = common::create_user(&pool, "coach@iguana.test", UserRole::Trainer, &[]).await;
    let app = common::build_test_app(pool);

    let uri = format!("/api/v1/challenges/{}/join", challenge.id);
    let response = post_json_auth(app.clone(), &uri, json!({}), &token_for(&free)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(app, &uri, json!({}), &token_for(&trainer)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}
