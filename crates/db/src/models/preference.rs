//! Per-user key-value preferences.

use iguana_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `user_preferences` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserPreference {
    pub id: DbId,
    pub user_id: DbId,
    pub key: String,
    pub value: serde_json::Value,
    pub updated_at: Timestamp,
}
