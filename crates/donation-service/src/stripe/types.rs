//! Stripe API types.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use donation_core::{CustomerRecord, InvoiceRecord};

/// Stripe customer object.
#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    /// Stripe customer ID.
    pub id: String,
    /// Customer email.
    #[serde(default)]
    pub email: Option<String>,
    /// Customer name.
    #[serde(default)]
    pub name: Option<String>,
    /// Created timestamp (Unix).
    #[serde(default)]
    pub created: i64,
}

impl From<Customer> for CustomerRecord {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            email: customer.email,
        }
    }
}

/// Stripe invoice object.
#[derive(Debug, Clone, Deserialize)]
pub struct Invoice {
    /// Invoice ID.
    pub id: String,
    /// Status (draft, open, paid, uncollectible, void).
    #[serde(default)]
    pub status: Option<String>,
    /// Customer ID.
    #[serde(default)]
    pub customer: Option<String>,
    /// Hosted payment page, set on finalization.
    #[serde(default)]
    pub hosted_invoice_url: Option<String>,
    /// Amount due in cents.
    #[serde(default)]
    pub amount_due: i64,
    /// Currency (e.g., "usd").
    #[serde(default)]
    pub currency: Option<String>,
    /// Collection method.
    #[serde(default)]
    pub collection_method: Option<String>,
    /// Created timestamp (Unix).
    #[serde(default)]
    pub created: i64,
}

impl Invoice {
    /// Creation time, if Stripe sent a valid timestamp.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created, 0)
    }
}

impl From<Invoice> for InvoiceRecord {
    fn from(invoice: Invoice) -> Self {
        Self {
            id: invoice.id,
            status: invoice.status,
            hosted_invoice_url: invoice.hosted_invoice_url,
        }
    }
}

/// Stripe invoice item object.
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceItem {
    /// Invoice item ID.
    pub id: String,
    /// Amount in cents.
    #[serde(default)]
    pub amount: i64,
    /// Currency.
    #[serde(default)]
    pub currency: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Invoice the item is attached to.
    #[serde(default)]
    pub invoice: Option<String>,
}

/// Stripe list response wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeList<T> {
    /// Object type (always "list").
    pub object: String,
    /// Data items.
    pub data: Vec<T>,
    /// Whether there are more items.
    pub has_more: bool,
    /// URL for the list endpoint.
    #[serde(default)]
    pub url: Option<String>,
}

/// Stripe API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorResponse {
    /// Error details.
    pub error: StripeErrorDetail,
}

/// Stripe error detail.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorDetail {
    /// Error type.
    #[serde(rename = "type")]
    pub error_type: String,
    /// Error message.
    #[serde(default)]
    pub message: String,
    /// Error code.
    #[serde(default)]
    pub code: Option<String>,
    /// Parameter that caused the error.
    #[serde(default)]
    pub param: Option<String>,
}
