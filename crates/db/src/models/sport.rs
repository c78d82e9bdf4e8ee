//! Sport path catalog: categories and their levels.

use iguana_core::pricing::DualPrice;
use iguana_core::sport_access::CategorySnapshot;
use iguana_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `sport_categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SportCategory {
    pub id: DbId,
    pub name: String,
    pub key_name: String,
    pub description: Option<String>,
    pub is_published: bool,
    pub free_levels_count: i32,
    /// Minor units (cents).
    pub price_usd: i64,
    /// Minor units (grosze).
    pub price_pln: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SportCategory {
    pub fn price(&self) -> DualPrice {
        DualPrice::new(self.price_usd, self.price_pln)
    }

    pub fn snapshot(&self) -> CategorySnapshot {
        CategorySnapshot {
            id: self.id,
            name: self.name.clone(),
            key_name: self.key_name.clone(),
            free_levels_count: self.free_levels_count,
            price: self.price(),
        }
    }
}

/// DTO for creating a sport category.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSportCategory {
    pub name: String,
    pub key_name: String,
    pub description: Option<String>,
    pub is_published: bool,
    pub free_levels_count: i32,
    pub price_usd: i64,
    pub price_pln: i64,
}

/// A row from the `sport_levels` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SportLevel {
    pub id: DbId,
    pub sport_category_id: DbId,
    pub level_number: i32,
    pub title: String,
    pub description: Option<String>,
    pub is_published: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a sport level.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSportLevel {
    pub sport_category_id: DbId,
    pub level_number: i32,
    pub title: String,
    pub description: Option<String>,
    pub is_published: bool,
}
