//! Handlers for per-user preferences (`/user/preferences/{key}`).
//!
//! Values are stored through the [`PreferenceStore`] port. The training
//! library filters key is typed: reads fall back to the default filters and
//! writes must match [`TrainingLibraryFilters`]. Other keys hold free-form JSON.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use iguana_core::error::CoreError;
use iguana_core::preferences::{
    load_or_default, save, validate_key, PreferenceStore, TrainingLibraryFilters,
    TRAINING_LIBRARY_FILTERS_KEY,
};
use iguana_db::repositories::PgPreferenceStore;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PreferenceValue {
    pub key: String,
    pub value: serde_json::Value,
}

fn store_for(state: &AppState, auth: &AuthUser) -> PgPreferenceStore {
    PgPreferenceStore::new(state.pool.clone(), auth.user_id)
}

/// GET /api/v1/user/preferences/{key}
///
/// Returns 204 when nothing is stored under a free-form key.
pub async fn get_preference(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<impl IntoResponse> {
    validate_key(&key)?;
    let store = store_for(&state, &auth);

    let value = if key == TRAINING_LIBRARY_FILTERS_KEY {
        let filters: TrainingLibraryFilters = load_or_default(&store, &key).await?;
        Some(to_json(&filters)?)
    } else {
        store.get(&key).await?
    };

    match value {
        Some(value) => Ok(Json(DataResponse {
            data: PreferenceValue { key, value },
        })
        .into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// PUT /api/v1/user/preferences/{key}
pub async fn put_preference(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(value): Json<serde_json::Value>,
) -> AppResult<impl IntoResponse> {
    validate_key(&key)?;
    let store = store_for(&state, &auth);

    let stored = if key == TRAINING_LIBRARY_FILTERS_KEY {
        let filters: TrainingLibraryFilters = serde_json::from_value(value).map_err(|e| {
            CoreError::Validation(format!("Invalid training library filters: {e}"))
        })?;
        save(&store, &key, &filters).await?;
        to_json(&filters)?
    } else {
        store.set(&key, value.clone()).await?;
        value
    };

    tracing::info!(user_id = auth.user_id, key = %key, "Preference saved");

    Ok(Json(DataResponse {
        data: PreferenceValue { key, value: stored },
    }))
}

/// DELETE /api/v1/user/preferences/{key}
pub async fn delete_preference(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<impl IntoResponse> {
    validate_key(&key)?;
    let removed = store_for(&state, &auth).clear(&key).await?;

    tracing::info!(user_id = auth.user_id, key = %key, removed, "Preference cleared");

    Ok(StatusCode::NO_CONTENT)
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, CoreError> {
    serde_json::to_value(value).map_err(|e| CoreError::Internal(e.to_string()))
}
