//! Stripe integration for customers and invoices.
//!
//! Stripe handles:
//! - Customer lookup and registration by email
//! - Draft invoice creation and line items
//! - Invoice finalization and the hosted payment page

pub mod client;
pub mod types;

pub use client::StripeClient;
pub use client::StripeError;
pub use types::*;
