//! Repository for the `sport_categories` and `sport_levels` tables.

use iguana_core::types::DbId;
use sqlx::PgPool;

use crate::models::sport::{CreateSportCategory, CreateSportLevel, SportCategory, SportLevel};

const CATEGORY_COLUMNS: &str = "\
    id, name, key_name, description, is_published, free_levels_count, \
    price_usd, price_pln, created_at, updated_at";

const LEVEL_COLUMNS: &str = "\
    id, sport_category_id, level_number, title, description, is_published, \
    created_at, updated_at";

pub struct SportRepo;

impl SportRepo {
    // -----------------------------------------------------------------------
    // Categories
    // -----------------------------------------------------------------------

    pub async fn create_category(
        pool: &PgPool,
        input: &CreateSportCategory,
    ) -> Result<SportCategory, sqlx::Error> {
        let query = format!(
            "INSERT INTO sport_categories \
                (name, key_name, description, is_published, free_levels_count, price_usd, price_pln) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {CATEGORY_COLUMNS}"
        );
        sqlx::query_as::<_, SportCategory>(&query)
            .bind(&input.name)
            .bind(&input.key_name)
            .bind(&input.description)
            .bind(input.is_published)
            .bind(input.free_levels_count)
            .bind(input.price_usd)
            .bind(input.price_pln)
            .fetch_one(pool)
            .await
    }

    /// The published catalog, ordered by name.
    pub async fn list_published_categories(
        pool: &PgPool,
    ) -> Result<Vec<SportCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {CATEGORY_COLUMNS} FROM sport_categories \
             WHERE is_published = true ORDER BY name"
        );
        sqlx::query_as::<_, SportCategory>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn find_category_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SportCategory>, sqlx::Error> {
        let query = format!("SELECT {CATEGORY_COLUMNS} FROM sport_categories WHERE id = $1");
        sqlx::query_as::<_, SportCategory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_published_category_by_key(
        pool: &PgPool,
        key_name: &str,
    ) -> Result<Option<SportCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {CATEGORY_COLUMNS} FROM sport_categories \
             WHERE key_name = $1 AND is_published = true"
        );
        sqlx::query_as::<_, SportCategory>(&query)
            .bind(key_name)
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Levels
    // -----------------------------------------------------------------------

    pub async fn create_level(
        pool: &PgPool,
        input: &CreateSportLevel,
    ) -> Result<SportLevel, sqlx::Error> {
        let query = format!(
            "INSERT INTO sport_levels \
                (sport_category_id, level_number, title, description, is_published) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {LEVEL_COLUMNS}"
        );
        sqlx::query_as::<_, SportLevel>(&query)
            .bind(input.sport_category_id)
            .bind(input.level_number)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.is_published)
            .fetch_one(pool)
            .await
    }

    /// Published levels of a category in `level_number` order.
    pub async fn list_published_levels(
        pool: &PgPool,
        sport_category_id: DbId,
    ) -> Result<Vec<SportLevel>, sqlx::Error> {
        let query = format!(
            "SELECT {LEVEL_COLUMNS} FROM sport_levels \
             WHERE sport_category_id = $1 AND is_published = true \
             ORDER BY level_number"
        );
        sqlx::query_as::<_, SportLevel>(&query)
            .bind(sport_category_id)
            .fetch_all(pool)
            .await
    }
}
