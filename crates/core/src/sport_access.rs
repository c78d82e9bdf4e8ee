//! Sport-path entitlements.
//!
//! Classifies every published sport category for one user as full access,
//! demo access, or nothing, and answers per-level access questions. The
//! resolver works over snapshots (profile, purchases, catalog) loaded by the
//! caller and performs no I/O.

use std::collections::HashSet;

use serde::Serialize;

use crate::pricing::{Currency, DualPrice};
use crate::roles::UserRole;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// What the resolver needs to know about the user.
#[derive(Debug, Clone)]
pub struct EntitlementContext {
    pub role: UserRole,
    /// Declared sport interests (category `key_name`s).
    pub sports: Vec<String>,
    pub purchased_category_ids: HashSet<DbId>,
}

impl EntitlementContext {
    pub fn new(
        role: UserRole,
        sports: Vec<String>,
        purchased_category_ids: impl IntoIterator<Item = DbId>,
    ) -> Self {
        Self {
            role,
            sports,
            purchased_category_ids: purchased_category_ids.into_iter().collect(),
        }
    }

    pub fn is_premium_user(&self) -> bool {
        self.role.is_premium()
    }

    fn declares_sport(&self, key_name: &str) -> bool {
        self.sports.iter().any(|s| s == key_name)
    }
}

/// A published sport category as seen by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySnapshot {
    pub id: DbId,
    pub name: String,
    pub key_name: String,
    pub free_levels_count: i32,
    pub price: DualPrice,
}

impl CategorySnapshot {
    /// Levels numbered up to `free_levels_count` are free/demo levels.
    pub fn is_demo_level(&self, level_number: i32) -> bool {
        level_number <= self.free_levels_count
    }

    pub fn price_for(&self, currency: Currency) -> i64 {
        self.price.amount(currency)
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Per-category classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryAccess {
    pub has_full_access: bool,
    pub has_demo_access: bool,
    pub is_purchased: bool,
}

/// Accessibility of a single level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelAccess {
    Full,
    Demo,
    None,
}

impl LevelAccess {
    pub fn is_accessible(&self) -> bool {
        !matches!(self, Self::None)
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

pub struct SportAccessResolver<'a> {
    context: &'a EntitlementContext,
    catalog: &'a [CategorySnapshot],
}

impl<'a> SportAccessResolver<'a> {
    pub fn new(context: &'a EntitlementContext, catalog: &'a [CategorySnapshot]) -> Self {
        Self { context, catalog }
    }

    pub fn is_purchased(&self, category: &CategorySnapshot) -> bool {
        self.context.purchased_category_ids.contains(&category.id)
    }

    pub fn classify(&self, category: &CategorySnapshot) -> CategoryAccess {
        let is_premium = self.context.is_premium_user();
        let is_purchased = self.is_purchased(category);
        CategoryAccess {
            has_full_access: is_premium || is_purchased,
            has_demo_access: self.context.declares_sport(&category.key_name)
                && !is_purchased
                && !is_premium,
            is_purchased,
        }
    }

    /// Classify every category in the catalog, preserving catalog order.
    pub fn classify_all(&self) -> Vec<(&'a CategorySnapshot, CategoryAccess)> {
        self.catalog
            .iter()
            .map(|category| (category, self.classify(category)))
            .collect()
    }

    pub fn find_category(&self, key_name: &str) -> Option<&'a CategorySnapshot> {
        self.catalog.iter().find(|c| c.key_name == key_name)
    }

    /// Whether a level of the category named `sport_key_name` may be opened.
    ///
    /// An unknown category grants nothing to non-premium users.
    pub fn can_access_level(&self, sport_key_name: &str, is_level_demo: bool) -> bool {
        if self.context.is_premium_user() {
            return true;
        }
        let Some(category) = self.find_category(sport_key_name) else {
            return false;
        };
        let access = self.classify(category);
        access.has_full_access || (access.has_demo_access && is_level_demo)
    }

    pub fn level_access(&self, category: &CategorySnapshot, level_number: i32) -> LevelAccess {
        let access = self.classify(category);
        if access.has_full_access {
            LevelAccess::Full
        } else if access.has_demo_access && category.is_demo_level(level_number) {
            LevelAccess::Demo
        } else {
            LevelAccess::None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
