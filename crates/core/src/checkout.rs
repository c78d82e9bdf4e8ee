//! Checkout session metadata and webhook event classification.
//!
//! Checkout sessions carry the buyer and the purchase target in their
//! `metadata`. When Stripe reports on a session, [`classify_event`] turns the
//! event into the single action the webhook handler must apply.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const EVENT_SESSION_COMPLETED: &str = "checkout.session.completed";
pub const EVENT_SESSION_EXPIRED: &str = "checkout.session.expired";
pub const EVENT_ASYNC_PAYMENT_SUCCEEDED: &str = "checkout.session.async_payment_succeeded";
pub const EVENT_ASYNC_PAYMENT_FAILED: &str = "checkout.session.async_payment_failed";

pub const PAYMENT_STATUS_PAID: &str = "paid";
pub const PAYMENT_STATUS_NO_PAYMENT_REQUIRED: &str = "no_payment_required";

pub const KIND_SPORT_PATH: &str = "sport_path";
pub const KIND_CHALLENGE: &str = "challenge";

pub const META_USER_ID: &str = "user_id";
pub const META_PURCHASE_KIND: &str = "purchase_kind";
pub const META_SPORT_CATEGORY_ID: &str = "sport_category_id";
pub const META_CHALLENGE_ID: &str = "challenge_id";

// ---------------------------------------------------------------------------
// Purchase targets
// ---------------------------------------------------------------------------

/// What a checkout session buys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PurchaseTarget {
    SportPath { sport_category_id: DbId },
    Challenge { challenge_id: DbId },
}

impl PurchaseTarget {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SportPath { .. } => KIND_SPORT_PATH,
            Self::Challenge { .. } => KIND_CHALLENGE,
        }
    }

    pub fn target_id(&self) -> DbId {
        match self {
            Self::SportPath { sport_category_id } => *sport_category_id,
            Self::Challenge { challenge_id } => *challenge_id,
        }
    }

    /// Rebuild a target from a stored `(kind, id)` pair.
    pub fn from_parts(kind: &str, id: DbId) -> Result<Self, CoreError> {
        match kind {
            KIND_SPORT_PATH => Ok(Self::SportPath {
                sport_category_id: id,
            }),
            KIND_CHALLENGE => Ok(Self::Challenge { challenge_id: id }),
            other => Err(CoreError::Validation(format!(
                "Unknown purchase kind '{other}'"
            ))),
        }
    }
}

/// Metadata pairs attached to a new checkout session.
pub fn session_metadata(user_id: DbId, target: PurchaseTarget) -> Vec<(String, String)> {
    let target_key = match target {
        PurchaseTarget::SportPath { .. } => META_SPORT_CATEGORY_ID,
        PurchaseTarget::Challenge { .. } => META_CHALLENGE_ID,
    };
    vec![
        (META_USER_ID.to_string(), user_id.to_string()),
        (META_PURCHASE_KIND.to_string(), target.kind().to_string()),
        (target_key.to_string(), target.target_id().to_string()),
    ]
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    #[error("Invalid event payload: {0}")]
    InvalidPayload(String),

    #[error("Checkout session is missing metadata '{0}'")]
    MissingMetadata(&'static str),

    #[error("Checkout session metadata '{key}' has invalid value '{value}'")]
    InvalidMetadata { key: &'static str, value: String },
}

impl From<EventError> for CoreError {
    fn from(value: EventError) -> Self {
        CoreError::Validation(value.to_string())
    }
}

/// The envelope of a Stripe event.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeEventData {
    pub object: serde_json::Value,
}

/// The fields of a Checkout Session object this service reads.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSessionObject {
    pub id: String,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub amount_total: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// A paid checkout ready to be turned into a purchase row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedCheckout {
    pub session_id: String,
    pub user_id: DbId,
    pub target: PurchaseTarget,
    pub amount_total: Option<i64>,
    pub currency: Option<String>,
}

/// What the webhook handler must do for an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookAction {
    /// Grant the purchase and mark the order completed.
    Complete(CompletedCheckout),
    /// Session finished but payment is still processing (delayed methods).
    AwaitPayment { session_id: String },
    /// Mark the order expired.
    Expire { session_id: String },
    /// Mark the order failed.
    Fail { session_id: String },
    /// Acknowledge and do nothing.
    Ignore,
}

pub fn parse_event(body: &[u8]) -> Result<StripeEvent, EventError> {
    serde_json::from_slice(body).map_err(|e| EventError::InvalidPayload(e.to_string()))
}

pub fn classify_event(event: &StripeEvent) -> Result<WebhookAction, EventError> {
    match event.event_type.as_str() {
        EVENT_SESSION_COMPLETED => {
            let session = session_object(event)?;
            let paid = matches!(
                session.payment_status.as_deref(),
                Some(PAYMENT_STATUS_PAID) | Some(PAYMENT_STATUS_NO_PAYMENT_REQUIRED)
            );
            if paid {
                completed_checkout(session).map(WebhookAction::Complete)
            } else {
                Ok(WebhookAction::AwaitPayment {
                    session_id: session.id,
                })
            }
        }
        EVENT_ASYNC_PAYMENT_SUCCEEDED => {
            completed_checkout(session_object(event)?).map(WebhookAction::Complete)
        }
        EVENT_SESSION_EXPIRED => Ok(WebhookAction::Expire {
            session_id: session_object(event)?.id,
        }),
        EVENT_ASYNC_PAYMENT_FAILED => Ok(WebhookAction::Fail {
            session_id: session_object(event)?.id,
        }),
        _ => Ok(WebhookAction::Ignore),
    }
}

fn session_object(event: &StripeEvent) -> Result<CheckoutSessionObject, EventError> {
    serde_json::from_value(event.data.object.clone())
        .map_err(|e| EventError::InvalidPayload(e.to_string()))
}

fn completed_checkout(session: CheckoutSessionObject) -> Result<CompletedCheckout, EventError> {
    let user_id = metadata_id(&session.metadata, META_USER_ID)?;
    let kind = session
        .metadata
        .get(META_PURCHASE_KIND)
        .ok_or(EventError::MissingMetadata(META_PURCHASE_KIND))?;

    let target = match kind.as_str() {
        KIND_SPORT_PATH => PurchaseTarget::SportPath {
            sport_category_id: metadata_id(&session.metadata, META_SPORT_CATEGORY_ID)?,
        },
        KIND_CHALLENGE => PurchaseTarget::Challenge {
            challenge_id: metadata_id(&session.metadata, META_CHALLENGE_ID)?,
        },
        other => {
            return Err(EventError::InvalidMetadata {
                key: META_PURCHASE_KIND,
                value: other.to_string(),
            })
        }
    };

    Ok(CompletedCheckout {
        session_id: session.id,
        user_id,
        target,
        amount_total: session.amount_total,
        currency: session.currency,
    })
}

fn metadata_id(metadata: &HashMap<String, String>, key: &'static str) -> Result<DbId, EventError> {
    let raw = metadata.get(key).ok_or(EventError::MissingMetadata(key))?;
    raw.parse::<DbId>().map_err(|_| EventError::InvalidMetadata {
        key,
        value: raw.clone(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
