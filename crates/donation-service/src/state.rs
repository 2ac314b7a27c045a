//! Application state.

use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::issuer::{InvoiceIssuer, InvoiceProvider};
use crate::stripe::{StripeClient, StripeError};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: ServiceConfig,

    /// Invoice issuer bound to the billing provider.
    pub issuer: InvoiceIssuer,
}

impl AppState {
    /// Create application state over an explicit provider.
    #[must_use]
    pub fn new(config: ServiceConfig, provider: Arc<dyn InvoiceProvider>) -> Self {
        Self {
            config,
            issuer: InvoiceIssuer::new(provider),
        }
    }

    /// Create application state backed by Stripe, using the configured key and base URL.
    pub fn with_stripe(config: ServiceConfig) -> Result<Self, StripeError> {
        let stripe =
            StripeClient::with_base_url(&config.stripe_secret_key, &config.stripe_api_base)?;
        tracing::info!(api_base = %config.stripe_api_base, "Stripe integration enabled");

        Ok(Self::new(config, Arc::new(stripe)))
    }
}
