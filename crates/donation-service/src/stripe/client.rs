//! Stripe API client implementation.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use donation_core::{CustomerRecord, InvoiceRecord, NewInvoice, NewLineItem, ProviderError};

use super::types::{Customer, Invoice, InvoiceItem, StripeErrorResponse, StripeList};
use crate::issuer::InvoiceProvider;

/// Error type for Stripe operations.
#[derive(Debug, thiserror::Error)]
pub enum StripeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Stripe API returned an error.
    #[error("Stripe API error: {error_type} - {message}")]
    Api {
        /// Error type.
        error_type: String,
        /// Error message.
        message: String,
        /// Error code.
        code: Option<String>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<StripeError> for ProviderError {
    fn from(err: StripeError) -> Self {
        match err {
            StripeError::Api { message, code, .. } => Self { message, code },
            other => Self::new(other.to_string()),
        }
    }
}

/// Stripe API client.
#[derive(Debug, Clone)]
pub struct StripeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl StripeClient {
    /// Stripe API base URL.
    pub const BASE_URL: &'static str = "https://api.stripe.com/v1";

    /// Request timeout for every Stripe call.
    const TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a new Stripe client against the live API.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Stripe secret API key (`sk_test_...` or `sk_live_...`)
    pub fn new(api_key: impl Into<String>) -> Result<Self, StripeError> {
        Self::with_base_url(api_key, Self::BASE_URL)
    }

    /// Create a Stripe client against a different base URL (mock servers, proxies).
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, StripeError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(StripeError::Configuration("API key is empty".into()));
        }

        let client = Client::builder().timeout(Self::TIMEOUT).build()?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// List customers with an exact email match.
    ///
    /// # Arguments
    ///
    /// * `email` - Email to match
    /// * `limit` - Maximum number of results (1-100)
    pub async fn list_customers_by_email(
        &self,
        email: &str,
        limit: u32,
    ) -> Result<StripeList<Customer>, StripeError> {
        let limit = limit.clamp(1, 100).to_string();

        let response = self
            .client
            .get(format!("{}/customers", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .query(&[("email", email), ("limit", limit.as_str())])
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Create a new Stripe customer with the given email.
    pub async fn create_customer(&self, email: &str) -> Result<Customer, StripeError> {
        let response = self
            .client
            .post(format!("{}/customers", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .form(&[("email", email)])
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Create a draft invoice.
    pub async fn create_invoice(&self, invoice: &NewInvoice) -> Result<Invoice, StripeError> {
        let params = [
            ("customer", invoice.customer_id.clone()),
            (
                "collection_method",
                invoice.collection_method.as_str().to_string(),
            ),
            ("days_until_due", invoice.days_until_due.to_string()),
            ("auto_advance", invoice.auto_advance.to_string()),
        ];

        let response = self
            .client
            .post(format!("{}/invoices", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .form(&params)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Create an invoice item attached to a draft invoice.
    pub async fn create_invoice_item(
        &self,
        item: &NewLineItem,
    ) -> Result<InvoiceItem, StripeError> {
        let params = [
            ("customer", item.customer_id.clone()),
            ("invoice", item.invoice_id.clone()),
            ("amount", item.amount.cents().to_string()),
            ("currency", item.currency.to_string()),
            ("description", item.description.clone()),
        ];

        let response = self
            .client
            .post(format!("{}/invoiceitems", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .form(&params)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Finalize a draft invoice, locking it and generating the hosted page.
    pub async fn finalize_invoice(&self, invoice_id: &str) -> Result<Invoice, StripeError> {
        let response = self
            .client
            .post(format!("{}/invoices/{}/finalize", self.base_url, invoice_id))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .send()
            .await?;

        let invoice: Invoice = self.handle_response(response).await?;

        tracing::debug!(
            invoice_id = %invoice.id,
            status = ?invoice.status,
            created_at = ?invoice.created_at(),
            "Stripe invoice finalized"
        );

        Ok(invoice)
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, StripeError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Try to parse error response
        let error_body: Result<StripeErrorResponse, _> = response.json().await;

        match error_body {
            Ok(stripe_error) => Err(StripeError::Api {
                error_type: stripe_error.error.error_type,
                message: stripe_error.error.message,
                code: stripe_error.error.code,
            }),
            Err(_) => Err(StripeError::Api {
                error_type: "unknown".to_string(),
                message: format!("HTTP {status}"),
                code: None,
            }),
        }
    }
}

#[async_trait]
impl InvoiceProvider for StripeClient {
    async fn find_customer_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CustomerRecord>, ProviderError> {
        let list = self.list_customers_by_email(email, 1).await?;
        Ok(list.data.into_iter().next().map(CustomerRecord::from))
    }

    async fn create_customer(&self, email: &str) -> Result<CustomerRecord, ProviderError> {
        Ok(Self::create_customer(self, email).await?.into())
    }

    async fn create_invoice(&self, invoice: &NewInvoice) -> Result<InvoiceRecord, ProviderError> {
        Ok(Self::create_invoice(self, invoice).await?.into())
    }

    async fn add_line_item(&self, item: &NewLineItem) -> Result<(), ProviderError> {
        self.create_invoice_item(item).await?;
        Ok(())
    }

    async fn finalize_invoice(&self, invoice_id: &str) -> Result<InvoiceRecord, ProviderError> {
        Ok(Self::finalize_invoice(self, invoice_id).await?.into())
    }
}
