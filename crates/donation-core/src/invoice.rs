//! Provider-neutral invoice records and creation parameters.

use serde::{Deserialize, Serialize};

use crate::amount::DonationAmount;
use crate::request::Donation;

/// Currency for every donation line item.
pub const DONATION_CURRENCY: &str = "usd";

/// A billing customer held by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    /// Provider customer ID.
    pub id: String,
    /// Customer email.
    pub email: Option<String>,
}

/// An invoice held by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Provider invoice ID.
    pub id: String,
    /// Provider status (`draft`, `open`, ...).
    pub status: Option<String>,
    /// Hosted payment page. Only present once finalized.
    pub hosted_invoice_url: Option<String>,
}

/// How the provider collects payment for an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionMethod {
    /// The payer is sent the invoice and pays through the hosted page.
    SendInvoice,
}

impl CollectionMethod {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SendInvoice => "send_invoice",
        }
    }
}

/// Parameters for a new draft invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    /// Customer the invoice is billed to.
    pub customer_id: String,
    /// Collection method.
    pub collection_method: CollectionMethod,
    /// Days until the invoice is due. Zero means due immediately.
    pub days_until_due: u32,
    /// Let the provider advance the invoice through its lifecycle.
    pub auto_advance: bool,
}

impl NewInvoice {
    /// A send-by-invoice, due-immediately, auto-advancing donation invoice.
    #[must_use]
    pub fn donation(customer_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            collection_method: CollectionMethod::SendInvoice,
            days_until_due: 0,
            auto_advance: true,
        }
    }
}

/// Parameters for a line item attached to a draft invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLineItem {
    /// Customer the item belongs to.
    pub customer_id: String,
    /// Invoice the item is attached to.
    pub invoice_id: String,
    /// Amount in cents.
    pub amount: DonationAmount,
    /// ISO currency code, lowercase.
    pub currency: &'static str,
    /// Description shown on the invoice.
    pub description: String,
}

impl NewLineItem {
    /// The single line item for a donation.
    #[must_use]
    pub fn donation(customer_id: &str, invoice_id: &str, donation: &Donation) -> Self {
        Self {
            customer_id: customer_id.to_string(),
            invoice_id: invoice_id.to_string(),
            amount: donation.amount,
            currency: DONATION_CURRENCY,
            description: donation.description.clone(),
        }
    }
}

/// Result of a successful issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedInvoice {
    /// Provider invoice ID.
    pub invoice_id: String,
    /// Hosted payment page.
    pub invoice_url: Option<String>,
    /// Customer the invoice was issued to.
    pub customer_id: String,
}
