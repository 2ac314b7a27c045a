//! Donation requests.

use serde::Deserialize;
use serde_json::value::RawValue;

use crate::amount::DonationAmount;
use crate::error::ValidationError;

/// Line item description used when the caller does not supply one.
pub const DEFAULT_DESCRIPTION: &str = "Donation";

/// A donation as received from the caller. Nothing here is trusted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DonationRequest {
    /// Dollar amount, kept as unparsed JSON (normally a number or string).
    #[serde(default)]
    pub amount: Option<Box<RawValue>>,
    /// Payer email.
    #[serde(default)]
    pub email: Option<String>,
    /// Optional line item description.
    #[serde(default)]
    pub description: Option<String>,
}

impl DonationRequest {
    /// Validate the request.
    ///
    /// Checks run in order and the first failure wins: amount too small,
    /// amount too large, missing email.
    pub fn validate(self) -> Result<Donation, ValidationError> {
        let amount = DonationAmount::from_raw_json(self.amount.as_deref())?;

        let email = self
            .email
            .filter(|e| !e.is_empty())
            .ok_or(ValidationError::MissingEmail)?;

        let description = self
            .description
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

        Ok(Donation {
            amount,
            email,
            description,
        })
    }
}

/// A validated donation, ready to be invoiced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Donation {
    /// Amount in cents.
    pub amount: DonationAmount,
    /// Payer email, non-empty.
    pub email: String,
    /// Line item description with the default applied.
    pub description: String,
}
