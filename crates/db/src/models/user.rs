//! User entity model and DTOs.

use iguana_core::error::CoreError;
use iguana_core::roles::{RoleBadge, UserRole};
use iguana_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserProfile`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: String,
    /// Declared sport interests (sport category `key_name`s).
    pub sports: Vec<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    pub fn parsed_role(&self) -> Result<UserRole, CoreError> {
        UserRole::from_str_value(&self.role).map_err(CoreError::Internal)
    }

    pub fn profile(&self) -> Result<UserProfile, CoreError> {
        let role = self.parsed_role()?;
        Ok(UserProfile {
            id: self.id,
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            role,
            badge: role.badge(),
            sports: self.sports.clone(),
            created_at: self.created_at,
        })
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: DbId,
    pub email: String,
    pub display_name: String,
    pub role: UserRole,
    pub badge: RoleBadge,
    pub sports: Vec<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a new user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: UserRole,
    #[serde(default)]
    pub sports: Vec<String>,
}
