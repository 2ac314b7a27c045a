//! Stripe Donation HTTP API Service.
//!
//! This crate provides the HTTP API that turns a donation form submission into
//! a finalized Stripe invoice with a hosted payment page:
//!
//! - Amount and email validation
//! - Customer lookup-or-create by email
//! - Invoice creation, line item, finalization
//!
//! # Provider injection
//!
//! The workflow in [`issuer`] depends only on the [`InvoiceProvider`] trait.
//! The binary wires in [`StripeClient`]; tests substitute their own provider.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Fallback handlers need async for consistency

pub mod config;
pub mod error;
pub mod handlers;
pub mod issuer;
pub mod routes;
pub mod state;
pub mod stripe;

pub use config::{ConfigError, ServiceConfig};
pub use error::ApiError;
pub use issuer::{InvoiceIssuer, InvoiceProvider};
pub use routes::create_router;
pub use state::AppState;
pub use stripe::{StripeClient, StripeError};
