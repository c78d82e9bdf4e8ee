use std::sync::Arc;

use crate::config::ServerConfig;
use crate::stripe::StripeClient;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: iguana_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Stripe REST client used to open checkout sessions.
    pub stripe: Arc<StripeClient>,
}
