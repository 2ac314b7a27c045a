//! Donation invoice handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

use donation_core::{DonationRequest, IssuedInvoice};

use crate::error::ApiError;
use crate::state::AppState;

/// Create invoice response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceResponse {
    /// Always `true`.
    pub success: bool,
    /// Hosted payment page for the finalized invoice.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_url: Option<String>,
    /// Stripe invoice ID.
    pub invoice_id: String,
}

impl From<IssuedInvoice> for CreateInvoiceResponse {
    fn from(issued: IssuedInvoice) -> Self {
        Self {
            success: true,
            invoice_url: issued.invoice_url,
            invoice_id: issued.invoice_id,
        }
    }
}

/// Validate a donation and issue a finalized Stripe invoice for it.
pub async fn create_invoice(
    State(state): State<Arc<AppState>>,
    body: Result<Json<DonationRequest>, JsonRejection>,
) -> Result<Json<CreateInvoiceResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let donation = request.validate().map_err(|e| {
        tracing::warn!(reason = %e, "Donation rejected");
        e
    })?;

    tracing::debug!(
        amount_cents = donation.amount.cents(),
        "Issuing donation invoice"
    );

    let issued = state.issuer.issue_validated(&donation).await?;

    Ok(Json(CreateInvoiceResponse::from(issued)))
}

/// Fallback for methods other than POST (OPTIONS is answered by the CORS layer).
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
