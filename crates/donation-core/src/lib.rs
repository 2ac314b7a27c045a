//! Core types for the Stripe donation API.
//!
//! This crate holds everything about a donation that does not touch the network:
//!
//! - **Amounts**: `DonationAmount` and the dollar-to-cents conversion rules
//! - **Requests**: `DonationRequest` (untrusted input) and `Donation` (validated)
//! - **Invoices**: provider-neutral records and creation parameters
//! - **Errors**: `ValidationError`, `ProviderError`, `IssueError`
//!
//! # Amount Unit
//!
//! Amounts are stored as `i64` integer cents. A donation must be between
//! $1.00 (`100`) and $999,999.00 (`99_999_900`) inclusive.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod amount;
pub mod error;
pub mod invoice;
pub mod request;

pub use amount::{DonationAmount, MAX_DONATION_CENTS, MIN_DONATION_CENTS};
pub use error::{IssueError, ProviderError, ValidationError, WorkflowStep};
pub use invoice::{
    CollectionMethod, CustomerRecord, InvoiceRecord, IssuedInvoice, NewInvoice, NewLineItem,
    DONATION_CURRENCY,
};
pub use request::{Donation, DonationRequest, DEFAULT_DESCRIPTION};
