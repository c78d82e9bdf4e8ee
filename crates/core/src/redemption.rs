//! Redemption codes: format rules, redeemability and generation.

use rand::Rng;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Minimum accepted code length after normalization.
pub const MIN_CODE_LENGTH: usize = 4;

/// Maximum accepted code length after normalization.
pub const MAX_CODE_LENGTH: usize = 32;

/// Length of codes generated by [`generate_code`].
pub const GENERATED_CODE_LENGTH: usize = 10;

/// Generated codes avoid look-alike characters (0/O, 1/I).
const GENERATED_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Why a known code cannot be redeemed right now.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RedemptionRejection {
    #[error("Redemption code is no longer active")]
    Inactive,

    #[error("Redemption code has expired")]
    Expired,

    #[error("Redemption code has reached its usage limit")]
    Exhausted,
}

impl From<RedemptionRejection> for CoreError {
    fn from(value: RedemptionRejection) -> Self {
        CoreError::Validation(value.to_string())
    }
}

/// The mutable state of a stored code.
#[derive(Debug, Clone)]
pub struct CodeUsage {
    pub is_active: bool,
    pub max_uses: Option<i32>,
    pub uses_count: i32,
    pub expires_at: Option<Timestamp>,
}

/// Trim and upper-case user input.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// Validate the format of an already normalized code.
pub fn validate_code_format(code: &str) -> Result<(), CoreError> {
    if code.len() < MIN_CODE_LENGTH || code.len() > MAX_CODE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Redemption code must be between {MIN_CODE_LENGTH} and {MAX_CODE_LENGTH} characters"
        )));
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(CoreError::Validation(
            "Redemption code may only contain letters, digits and '-'".into(),
        ));
    }
    Ok(())
}

/// Check whether a code with `usage` can be redeemed at `now`.
pub fn check_redeemable(usage: &CodeUsage, now: Timestamp) -> Result<(), RedemptionRejection> {
    if !usage.is_active {
        return Err(RedemptionRejection::Inactive);
    }
    if usage.expires_at.is_some_and(|at| at <= now) {
        return Err(RedemptionRejection::Expired);
    }
    if usage.max_uses.is_some_and(|max| usage.uses_count >= max) {
        return Err(RedemptionRejection::Exhausted);
    }
    Ok(())
}

/// Generate a random code of [`GENERATED_CODE_LENGTH`] characters.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..GENERATED_CODE_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..GENERATED_CODE_ALPHABET.len());
            GENERATED_CODE_ALPHABET[idx] as char
        })
        .collect()
}
