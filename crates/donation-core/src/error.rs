//! Error types for donation intake and invoice issuance.

use std::fmt;

/// Caller input that was rejected before any provider call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Amount missing, unparsable, or below $1.00.
    #[error("Minimum donation is $1.00")]
    AmountTooSmall,

    /// Amount above $999,999.00.
    #[error("Amount too large")]
    AmountTooLarge,

    /// Email missing or empty.
    #[error("Email is required")]
    MissingEmail,
}

/// A failure reported by the billing provider.
///
/// `message` is the provider's own wording and is surfaced to callers verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ProviderError {
    /// Human-readable message from the provider.
    pub message: String,
    /// Provider error code, when one was returned.
    pub code: Option<String>,
}

impl ProviderError {
    /// Create a provider error with no code.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }
}

/// The four provider-facing steps of invoice issuance, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStep {
    /// Look up the customer by email, creating one if absent.
    ResolveCustomer,
    /// Create the draft invoice.
    CreateInvoice,
    /// Attach the donation line item.
    AttachLineItem,
    /// Finalize the invoice and obtain its hosted URL.
    FinalizeInvoice,
}

impl WorkflowStep {
    /// Stable snake-case name, used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ResolveCustomer => "resolve_customer",
            Self::CreateInvoice => "create_invoice",
            Self::AttachLineItem => "attach_line_item",
            Self::FinalizeInvoice => "finalize_invoice",
        }
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by invoice issuance.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IssueError {
    /// The request was rejected; nothing was sent to the provider.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A provider call failed. Earlier steps are not rolled back.
    #[error("{step} failed: {source}")]
    Provider {
        /// The step that failed.
        step: WorkflowStep,
        /// The underlying provider failure.
        #[source]
        source: ProviderError,
    },
}

impl IssueError {
    /// Wrap a provider failure with the step it happened in.
    #[must_use]
    pub fn provider(step: WorkflowStep, source: ProviderError) -> Self {
        Self::Provider { step, source }
    }

    /// Whether the caller is at fault.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
