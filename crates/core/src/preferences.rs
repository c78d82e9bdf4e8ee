//! Key-value preference port.
//!
//! UI state that should survive between visits (e.g. the training library
//! filters) is stored through [`PreferenceStore`] rather than client-side
//! storage. The database crate provides the PostgreSQL implementation;
//! [`MemoryPreferenceStore`] backs tests and tooling.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::CoreError;

/// Key under which [`TrainingLibraryFilters`] are stored.
pub const TRAINING_LIBRARY_FILTERS_KEY: &str = "training_library_filters";

/// Maximum length of a preference key.
pub const MAX_KEY_LENGTH: usize = 64;

#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, CoreError>;

    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), CoreError>;

    /// Remove `key`. Returns whether a value was present.
    async fn clear(&self, key: &str) -> Result<bool, CoreError>;
}

/// Keys are lower-case `a-z`, `0-9` and `_`, at most [`MAX_KEY_LENGTH`] long.
pub fn validate_key(key: &str) -> Result<(), CoreError> {
    let valid = !key.is_empty()
        && key.len() <= MAX_KEY_LENGTH
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid preference key '{key}'. Use up to {MAX_KEY_LENGTH} characters of a-z, 0-9 and '_'"
        )))
    }
}

/// Load a typed value, falling back to `T::default()` when the key is
/// missing or the stored JSON no longer matches `T`.
pub async fn load_or_default<T>(store: &dyn PreferenceStore, key: &str) -> Result<T, CoreError>
where
    T: DeserializeOwned + Default,
{
    Ok(store
        .get(key)
        .await?
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or_default())
}

pub async fn save<T: Serialize + Sync>(
    store: &dyn PreferenceStore,
    key: &str,
    value: &T,
) -> Result<(), CoreError> {
    let json = serde_json::to_value(value).map_err(|e| CoreError::Internal(e.to_string()))?;
    store.set(key, json).await
}

// ---------------------------------------------------------------------------
// Training library filters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingLibraryFilters {
    /// Sport category `key_name`, or `None` for all.
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub search: String,
    pub premium_only: bool,
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: RwLock<HashMap<String, serde_json::Value>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, CoreError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), CoreError> {
        self.values.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<bool, CoreError> {
        Ok(self.values.write().await.remove(key).is_some())
    }
}
