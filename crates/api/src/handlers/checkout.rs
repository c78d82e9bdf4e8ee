//! Handlers that open Stripe Checkout Sessions.
//!
//! Each handler checks the target is purchasable for the caller, opens a
//! session carrying the purchase in its metadata, and records a `pending`
//! payment order. The purchase itself is only granted by the webhook.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use iguana_core::checkout::PurchaseTarget;
use iguana_core::error::CoreError;
use iguana_core::pricing::Currency;
use iguana_core::types::DbId;
use iguana_db::models::order::CreatePaymentOrder;
use iguana_db::repositories::{ChallengeRepo, OrderRepo, PurchaseRepo, SportRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::load_active_user;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::stripe::CheckoutRequest;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /checkout/sport-path`.
#[derive(Debug, Deserialize, Validate)]
pub struct SportPathCheckoutRequest {
    #[validate(range(min = 1))]
    pub sport_category_id: DbId,
    pub currency: Currency,
}

/// Request body for `POST /checkout/challenge`.
#[derive(Debug, Deserialize, Validate)]
pub struct ChallengeCheckoutRequest {
    #[validate(range(min = 1))]
    pub challenge_id: DbId,
    pub currency: Currency,
}

/// Where the client should redirect the buyer.
#[derive(Debug, Serialize)]
pub struct CheckoutSessionResponse {
    pub session_id: String,
    pub url: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/checkout/sport-path
pub async fn checkout_sport_path(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SportPathCheckoutRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let user = load_active_user(&state.pool, auth.user_id).await?;

    let category = SportRepo::find_category_by_id(&state.pool, input.sport_category_id)
        .await?
        .filter(|c| c.is_published)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SportCategory",
            id: input.sport_category_id,
        }))?;

    if user.parsed_role()?.is_premium() {
        return Err(AppError::Core(CoreError::Conflict(
            "Premium accounts already include every sport path".into(),
        )));
    }
    if PurchaseRepo::has_sport_purchase(&state.pool, user.id, category.id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Sport path already purchased".into(),
        )));
    }

    let request = CheckoutRequest {
        user_id: user.id,
        target: PurchaseTarget::SportPath {
            sport_category_id: category.id,
        },
        product_name: category.name.clone(),
        currency: input.currency,
        unit_amount: category.price().amount(input.currency),
    };
    open_session(&state, request).await
}

/// POST /api/v1/checkout/challenge
pub async fn checkout_challenge(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ChallengeCheckoutRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let user = load_active_user(&state.pool, auth.user_id).await?;

    let challenge = ChallengeRepo::find_published_by_id(&state.pool, input.challenge_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Challenge",
            id: input.challenge_id,
        }))?;

    if !challenge.is_premium {
        return Err(AppError::Core(CoreError::Validation(
            "This challenge is free to join".into(),
        )));
    }
    if user.parsed_role()?.is_premium() {
        return Err(AppError::Core(CoreError::Conflict(
            "Premium accounts already include every challenge".into(),
        )));
    }
    if PurchaseRepo::has_challenge_purchase(&state.pool, user.id, challenge.id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Challenge already purchased".into(),
        )));
    }

    let request = CheckoutRequest {
        user_id: user.id,
        target: PurchaseTarget::Challenge {
            challenge_id: challenge.id,
        },
        product_name: challenge.title.clone(),
        currency: input.currency,
        unit_amount: challenge.price().amount(input.currency),
    };
    open_session(&state, request).await
}

async fn open_session(
    state: &AppState,
    request: CheckoutRequest,
) -> AppResult<(StatusCode, Json<DataResponse<CheckoutSessionResponse>>)> {
    if request.unit_amount <= 0 {
        return Err(AppError::Core(CoreError::Validation(format!(
            "No {} price is set for this item",
            request.currency.as_str()
        ))));
    }

    let (session_id, url) = state
        .stripe
        .create_checkout_session(&request)
        .await
        .map_err(|e| AppError::Payment(e.to_string()))?;

    let order = OrderRepo::create(
        &state.pool,
        &CreatePaymentOrder {
            user_id: request.user_id,
            stripe_session_id: session_id.clone(),
            purchase_kind: request.target.kind().to_string(),
            target_id: request.target.target_id(),
            amount: request.unit_amount,
            currency: request.currency.as_str().to_string(),
        },
    )
    .await?;

    tracing::info!(
        user_id = request.user_id,
        order_id = order.id,
        purchase_kind = request.target.kind(),
        target_id = request.target.target_id(),
        amount = request.unit_amount,
        currency = request.currency.as_str(),
        "Checkout session created",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CheckoutSessionResponse { session_id, url },
        }),
    ))
}
