//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod challenge_repo;
pub mod order_repo;
pub mod preference_repo;
pub mod purchase_repo;
pub mod redemption_code_repo;
pub mod sport_repo;
pub mod user_repo;

pub use challenge_repo::ChallengeRepo;
pub use order_repo::{CheckoutApplied, OrderRepo};
pub use preference_repo::{PgPreferenceStore, PreferenceRepo};
pub use purchase_repo::PurchaseRepo;
pub use redemption_code_repo::{RedeemOutcome, RedemptionCodeRepo};
pub use sport_repo::SportRepo;
pub use user_repo::UserRepo;
