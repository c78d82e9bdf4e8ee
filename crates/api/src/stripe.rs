//! Stripe REST client for opening Checkout Sessions.
//!
//! Only the one call this service needs is wrapped: `POST
//! /v1/checkout/sessions`, form-encoded and authenticated with the secret
//! key. The base URL is configurable so tests and staging can point at a
//! stub server.

use iguana_core::checkout::{session_metadata, PurchaseTarget};
use iguana_core::pricing::Currency;
use iguana_core::stripe_signature::DEFAULT_TOLERANCE_SECS;
use iguana_core::types::DbId;
use serde::Deserialize;

/// Default Stripe API base URL.
const DEFAULT_API_BASE: &str = "https://api.stripe.com";

/// Stripe credentials and checkout redirect URLs.
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Secret API key (`sk_...`).
    pub secret_key: String,
    /// Webhook endpoint signing secret (`whsec_...`).
    pub webhook_secret: String,
    pub api_base: String,
    /// Where Stripe sends the buyer after paying.
    pub success_url: String,
    /// Where Stripe sends the buyer after abandoning checkout.
    pub cancel_url: String,
    /// Accepted clock skew for webhook signatures, in seconds.
    pub signature_tolerance_secs: i64,
}

impl StripeConfig {
    /// Load Stripe configuration from environment variables.
    ///
    /// | Env Var                           | Required | Default                                   |
    /// |-----------------------------------|----------|-------------------------------------------|
    /// | `STRIPE_SECRET_KEY`               | **yes**  | --                                        |
    /// | `STRIPE_WEBHOOK_SECRET`           | **yes**  | --                                        |
    /// | `STRIPE_API_BASE`                 | no       | `https://api.stripe.com`                  |
    /// | `CHECKOUT_SUCCESS_URL`            | no       | `http://localhost:5173/payment/success`   |
    /// | `CHECKOUT_CANCEL_URL`             | no       | `http://localhost:5173/payment/cancelled` |
    /// | `STRIPE_SIGNATURE_TOLERANCE_SECS` | no       | `300`                                     |
    ///
    /// # Panics
    ///
    /// Panics if a required secret is missing or empty.
    pub fn from_env() -> Self {
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .expect("STRIPE_SECRET_KEY must be set in the environment");
        assert!(!secret_key.is_empty(), "STRIPE_SECRET_KEY must not be empty");

        let webhook_secret = std::env::var("STRIPE_WEBHOOK_SECRET")
            .expect("STRIPE_WEBHOOK_SECRET must be set in the environment");
        assert!(
            !webhook_secret.is_empty(),
            "STRIPE_WEBHOOK_SECRET must not be empty"
        );

        let api_base = std::env::var("STRIPE_API_BASE")
            .unwrap_or_else(|_| DEFAULT_API_BASE.into())
            .trim_end_matches('/')
            .to_string();

        let success_url = std::env::var("CHECKOUT_SUCCESS_URL")
            .unwrap_or_else(|_| "http://localhost:5173/payment/success".into());
        let cancel_url = std::env::var("CHECKOUT_CANCEL_URL")
            .unwrap_or_else(|_| "http://localhost:5173/payment/cancelled".into());

        let signature_tolerance_secs: i64 = std::env::var("STRIPE_SIGNATURE_TOLERANCE_SECS")
            .unwrap_or_else(|_| DEFAULT_TOLERANCE_SECS.to_string())
            .parse()
            .expect("STRIPE_SIGNATURE_TOLERANCE_SECS must be a valid i64");

        Self {
            secret_key,
            webhook_secret,
            api_base,
            success_url,
            cancel_url,
            signature_tolerance_secs,
        }
    }
}

/// Errors from the Stripe REST layer.
#[derive(Debug, thiserror::Error)]
pub enum StripeApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Stripe returned a non-2xx status code.
    #[error("Stripe API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    /// The created session has no hosted checkout URL.
    #[error("Checkout session {0} has no redirect URL")]
    MissingUrl(String),
}

/// One line item to sell through Checkout.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub user_id: DbId,
    pub target: PurchaseTarget,
    /// Product name shown on the Stripe page.
    pub product_name: String,
    pub currency: Currency,
    /// Price in minor units.
    pub unit_amount: i64,
}

/// A created Checkout Session.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// HTTP client for the Stripe API.
pub struct StripeClient {
    client: reqwest::Client,
    api_base: String,
    secret_key: String,
    success_url: String,
    cancel_url: String,
}

impl StripeClient {
    pub fn new(config: &StripeConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: config.api_base.clone(),
            secret_key: config.secret_key.clone(),
            success_url: config.success_url.clone(),
            cancel_url: config.cancel_url.clone(),
        }
    }

    /// Open a one-off payment session and return its id and hosted URL.
    pub async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<(String, String), StripeApiError> {
        let form = session_form(request, &self.success_url, &self.cancel_url);

        let response = self
            .client
            .post(format!("{}/v1/checkout/sessions", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            return Err(StripeApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let session: CheckoutSession = response.json().await?;
        match session.url {
            Some(url) => Ok((session.id, url)),
            None => Err(StripeApiError::MissingUrl(session.id)),
        }
    }
}

/// Form fields for `POST /v1/checkout/sessions`.
fn session_form(
    request: &CheckoutRequest,
    success_url: &str,
    cancel_url: &str,
) -> Vec<(String, String)> {
    let mut form = vec![
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), success_url.to_string()),
        ("cancel_url".to_string(), cancel_url.to_string()),
        (
            "client_reference_id".to_string(),
            request.user_id.to_string(),
        ),
        ("line_items[0][quantity]".to_string(), "1".to_string()),
        (
            "line_items[0][price_data][currency]".to_string(),
            request.currency.as_str().to_string(),
        ),
        (
            "line_items[0][price_data][unit_amount]".to_string(),
            request.unit_amount.to_string(),
        ),
        (
            "line_items[0][price_data][product_data][name]".to_string(),
            request.product_name.clone(),
        ),
    ];

    if request.currency == Currency::Pln {
        // BLIK and Przelewy24 settle asynchronously; the webhook handles both.
        form.push(("payment_method_types[0]".to_string(), "card".to_string()));
        form.push(("payment_method_types[1]".to_string(), "blik".to_string()));
        form.push(("payment_method_types[2]".to_string(), "p24".to_string()));
    }

    form.extend(
        session_metadata(request.user_id, request.target)
            .into_iter()
            .map(|(key, value)| (format!("metadata[{key}]"), value)),
    );
    form
}
