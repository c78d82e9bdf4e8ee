//! Repository for `user_preferences` and the PostgreSQL preference store.

use async_trait::async_trait;
use iguana_core::error::CoreError;
use iguana_core::preferences::PreferenceStore;
use iguana_core::types::DbId;
use sqlx::PgPool;

use crate::models::preference::UserPreference;

const COLUMNS: &str = "id, user_id, key, value, updated_at";

pub struct PreferenceRepo;

impl PreferenceRepo {
    pub async fn get(
        pool: &PgPool,
        user_id: DbId,
        key: &str,
    ) -> Result<Option<UserPreference>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM user_preferences WHERE user_id = $1 AND key = $2");
        sqlx::query_as::<_, UserPreference>(&query)
            .bind(user_id)
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<UserPreference, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_preferences (user_id, key, value) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, key) DO UPDATE SET value = EXCLUDED.value \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserPreference>(&query)
            .bind(user_id)
            .bind(key)
            .bind(value)
            .fetch_one(pool)
            .await
    }

    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, user_id: DbId, key: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_preferences WHERE user_id = $1 AND key = $2")
            .bind(user_id)
            .bind(key)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// [`PreferenceStore`] over `user_preferences`, scoped to one user.
pub struct PgPreferenceStore {
    pool: PgPool,
    user_id: DbId,
}

impl PgPreferenceStore {
    pub fn new(pool: PgPool, user_id: DbId) -> Self {
        Self { pool, user_id }
    }
}

fn storage_error(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Preference storage error");
    CoreError::Internal(format!("Preference storage error: {err}"))
}

#[async_trait]
impl PreferenceStore for PgPreferenceStore {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, CoreError> {
        let row = PreferenceRepo::get(&self.pool, self.user_id, key)
            .await
            .map_err(storage_error)?;
        Ok(row.map(|r| r.value))
    }

    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), CoreError> {
        PreferenceRepo::upsert(&self.pool, self.user_id, key, &value)
            .await
            .map_err(storage_error)?;
        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<bool, CoreError> {
        PreferenceRepo::delete(&self.pool, self.user_id, key)
            .await
            .map_err(storage_error)
    }
}
