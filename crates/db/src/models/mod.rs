//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - `Deserialize` create DTOs for inserts where rows are created from input

pub mod challenge;
pub mod order;
pub mod preference;
pub mod purchase;
pub mod redemption_code;
pub mod sport;
pub mod user;
