//! IguanaFlow domain logic.
//!
//! Everything in this crate is pure: evaluators operate on snapshots that the
//! caller has already loaded, and "now" is always passed in explicitly.

pub mod challenge_days;
pub mod checkout;
pub mod error;
pub mod preferences;
pub mod pricing;
pub mod redemption;
pub mod roles;
pub mod sport_access;
pub mod stripe_signature;
pub mod types;
