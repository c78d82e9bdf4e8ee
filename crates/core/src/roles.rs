//! User roles and their access tiers.
//!
//! Role names must match the `CHECK` constraint on `users.role` in
//! `20260301000001_create_users.sql`.

use serde::{Deserialize, Serialize};

pub const ROLE_FREE: &str = "free";
pub const ROLE_PREMIUM: &str = "premium";
pub const ROLE_TRAINER: &str = "trainer";
pub const ROLE_ADMIN: &str = "admin";

/// All valid role strings.
pub const VALID_ROLES: &[&str] = &[ROLE_FREE, ROLE_PREMIUM, ROLE_TRAINER, ROLE_ADMIN];

/// A platform role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Free,
    Premium,
    Trainer,
    Admin,
}

/// Display badge for a role (label shown in the UI, color token for styling).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleBadge {
    pub label: &'static str,
    pub color: &'static str,
}

impl UserRole {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            ROLE_FREE => Ok(Self::Free),
            ROLE_PREMIUM => Ok(Self::Premium),
            ROLE_TRAINER => Ok(Self::Trainer),
            ROLE_ADMIN => Ok(Self::Admin),
            _ => Err(format!(
                "Invalid role '{s}'. Must be one of: {}",
                VALID_ROLES.join(", ")
            )),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => ROLE_FREE,
            Self::Premium => ROLE_PREMIUM,
            Self::Trainer => ROLE_TRAINER,
            Self::Admin => ROLE_ADMIN,
        }
    }

    /// Premium, trainer and admin accounts see all paid content.
    pub fn is_premium(&self) -> bool {
        matches!(self, Self::Premium | Self::Trainer | Self::Admin)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    pub fn badge(&self) -> RoleBadge {
        match self {
            Self::Free => RoleBadge {
                label: "Darmowy",
                color: "gray",
            },
            Self::Premium => RoleBadge {
                label: "Premium",
                color: "amber",
            },
            Self::Trainer => RoleBadge {
                label: "Trener",
                color: "blue",
            },
            Self::Admin => RoleBadge {
                label: "Administrator",
                color: "red",
            },
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
