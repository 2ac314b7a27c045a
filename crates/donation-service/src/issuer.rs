//! Invoice issuance workflow.
//!
//! A donation becomes a hosted invoice in four provider calls, each depending
//! on the ID returned by the one before:
//!
//! 1. Resolve the customer by email (reuse the first match, else create)
//! 2. Create a draft invoice
//! 3. Attach the donation line item
//! 4. Finalize the invoice
//!
//! Nothing is retried and nothing is rolled back. A failure after step 1 can
//! leave a new customer or a draft invoice behind at the provider.
//!
//! Customer resolution is a read followed by a create, so two concurrent
//! requests for a new email may both create a customer.

use std::sync::Arc;

use async_trait::async_trait;

use donation_core::{
    CustomerRecord, Donation, DonationRequest, InvoiceRecord, IssueError, IssuedInvoice,
    NewInvoice, NewLineItem, ProviderError, WorkflowStep,
};

/// Billing provider operations needed to issue a donation invoice.
#[async_trait]
pub trait InvoiceProvider: Send + Sync {
    /// First customer whose email matches exactly, if any.
    async fn find_customer_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CustomerRecord>, ProviderError>;

    /// Create a customer with the given email.
    async fn create_customer(&self, email: &str) -> Result<CustomerRecord, ProviderError>;

    /// Create a draft invoice.
    async fn create_invoice(&self, invoice: &NewInvoice) -> Result<InvoiceRecord, ProviderError>;

    /// Attach a line item to a draft invoice.
    async fn add_line_item(&self, item: &NewLineItem) -> Result<(), ProviderError>;

    /// Finalize an invoice, returning it with its hosted URL.
    async fn finalize_invoice(&self, invoice_id: &str) -> Result<InvoiceRecord, ProviderError>;
}

/// Issues donation invoices through an injected provider.
#[derive(Clone)]
pub struct InvoiceIssuer {
    provider: Arc<dyn InvoiceProvider>,
}

impl InvoiceIssuer {
    /// Create an issuer over the given provider.
    #[must_use]
    pub fn new(provider: Arc<dyn InvoiceProvider>) -> Self {
        Self { provider }
    }

    /// Validate a raw request and issue its invoice.
    pub async fn issue(&self, request: DonationRequest) -> Result<IssuedInvoice, IssueError> {
        let donation = request.validate()?;
        self.issue_validated(&donation).await
    }

    /// Issue an invoice for an already-validated donation.
    pub async fn issue_validated(&self, donation: &Donation) -> Result<IssuedInvoice, IssueError> {
        let customer = self
            .resolve_customer(&donation.email)
            .await
            .map_err(|e| IssueError::provider(WorkflowStep::ResolveCustomer, e))?;

        let draft = self
            .provider
            .create_invoice(&NewInvoice::donation(&customer.id))
            .await
            .map_err(|e| IssueError::provider(WorkflowStep::CreateInvoice, e))?;

        tracing::debug!(
            customer_id = %customer.id,
            invoice_id = %draft.id,
            "Draft invoice created"
        );

        self.provider
            .add_line_item(&NewLineItem::donation(&customer.id, &draft.id, donation))
            .await
            .map_err(|e| IssueError::provider(WorkflowStep::AttachLineItem, e))?;

        tracing::debug!(
            invoice_id = %draft.id,
            amount_cents = donation.amount.cents(),
            description = %donation.description,
            "Donation line item attached"
        );

        let finalized = self
            .provider
            .finalize_invoice(&draft.id)
            .await
            .map_err(|e| IssueError::provider(WorkflowStep::FinalizeInvoice, e))?;

        if finalized.hosted_invoice_url.is_none() {
            tracing::warn!(invoice_id = %finalized.id, "Finalized invoice has no hosted URL");
        }

        tracing::info!(
            customer_id = %customer.id,
            invoice_id = %finalized.id,
            amount = %donation.amount,
            "Donation invoice issued"
        );

        Ok(IssuedInvoice {
            invoice_id: finalized.id,
            invoice_url: finalized.hosted_invoice_url,
            customer_id: customer.id,
        })
    }

    async fn resolve_customer(&self, email: &str) -> Result<CustomerRecord, ProviderError> {
        if let Some(customer) = self.provider.find_customer_by_email(email).await? {
            tracing::debug!(customer_id = %customer.id, "Reusing existing customer");
            return Ok(customer);
        }

        let customer = self.provider.create_customer(email).await?;
        tracing::info!(customer_id = %customer.id, "Customer created");
        Ok(customer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    use donation_core::ValidationError;

    /// Records calls and optionally fails at one step.
    #[derive(Default)]
    struct RecordingProvider {
        existing: Option<CustomerRecord>,
        fail_at: Option<WorkflowStep>,
        calls: Mutex<Vec<&'static str>>,
        line_items: Mutex<Vec<NewLineItem>>,
    }

    impl RecordingProvider {
        fn record(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }

        fn check(&self, step: WorkflowStep) -> Result<(), ProviderError> {
            if self.fail_at == Some(step) {
                Err(ProviderError::new(format!("{step} exploded")))
            } else {
                Ok(())
            }
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl InvoiceProvider for RecordingProvider {
        async fn find_customer_by_email(
            &self,
            _email: &str,
        ) -> Result<Option<CustomerRecord>, ProviderError> {
            self.record("find_customer");
            self.check(WorkflowStep::ResolveCustomer)?;
            Ok(self.existing.clone())
        }

        async fn create_customer(&self, email: &str) -> Result<CustomerRecord, ProviderError> {
            self.record("create_customer");
            Ok(CustomerRecord {
                id: "cus_new".into(),
                email: Some(email.into()),
            })
        }

        async fn create_invoice(
            &self,
            invoice: &NewInvoice,
        ) -> Result<InvoiceRecord, ProviderError> {
            self.record("create_invoice");
            self.check(WorkflowStep::CreateInvoice)?;
            assert_eq!(invoice.days_until_due, 0);
            Ok(InvoiceRecord {
                id: "in_1".into(),
                status: Some("draft".into()),
                hosted_invoice_url: None,
            })
        }

        async fn add_line_item(&self, item: &NewLineItem) -> Result<(), ProviderError> {
            self.record("add_line_item");
            self.check(WorkflowStep::AttachLineItem)?;
            self.line_items.lock().unwrap().push(item.clone());
            Ok(())
        }

        async fn finalize_invoice(
            &self,
            invoice_id: &str,
        ) -> Result<InvoiceRecord, ProviderError> {
            self.record("finalize_invoice");
            self.check(WorkflowStep::FinalizeInvoice)?;
            Ok(InvoiceRecord {
                id: invoice_id.into(),
                status: Some("open".into()),
                hosted_invoice_url: Some(format!("https://invoice.example/{invoice_id}")),
            })
        }
    }

    fn request(amount: serde_json::Value) -> DonationRequest {
        serde_json::from_value(json!({ "amount": amount, "email": "a@b.com" })).unwrap()
    }

    #[tokio::test]
    async fn creates_customer_when_none_exists() {
        let provider = Arc::new(RecordingProvider::default());
        let issuer = InvoiceIssuer::new(provider.clone());

        let issued = issuer.issue(request(json!("10.00"))).await.unwrap();

        assert_eq!(issued.customer_id, "cus_new");
        assert_eq!(issued.invoice_id, "in_1");
        assert_eq!(issued.invoice_url.as_deref(), Some("https://invoice.example/in_1"));
        assert_eq!(
            provider.calls(),
            [
                "find_customer",
                "create_customer",
                "create_invoice",
                "add_line_item",
                "finalize_invoice"
            ]
        );

        let items = provider.line_items.lock().unwrap();
        assert_eq!(items[0].amount.cents(), 1000);
        assert_eq!(items[0].description, "Donation");
    }

    #[tokio::test]
    async fn reuses_existing_customer() {
        let provider = Arc::new(RecordingProvider {
            existing: Some(CustomerRecord {
                id: "cus_existing".into(),
                email: Some("a@b.com".into()),
            }),
            ..Default::default()
        });
        let issuer = InvoiceIssuer::new(provider.clone());

        let issued = issuer.issue(request(json!(5))).await.unwrap();

        assert_eq!(issued.customer_id, "cus_existing");
        assert!(!provider.calls().contains(&"create_customer"));
    }

    #[tokio::test]
    async fn validation_failure_makes_no_provider_calls() {
        let provider = Arc::new(RecordingProvider::default());
        let issuer = InvoiceIssuer::new(provider.clone());

        let err = issuer.issue(request(json!("0.10"))).await.unwrap_err();

        assert_eq!(err, IssueError::Validation(ValidationError::AmountTooSmall));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn provider_failure_reports_step_and_stops() {
        for (step, last_call) in [
            (WorkflowStep::ResolveCustomer, "find_customer"),
            (WorkflowStep::CreateInvoice, "create_invoice"),
            (WorkflowStep::AttachLineItem, "add_line_item"),
            (WorkflowStep::FinalizeInvoice, "finalize_invoice"),
        ] {
            let provider = Arc::new(RecordingProvider {
                fail_at: Some(step),
                ..Default::default()
            });
            let issuer = InvoiceIssuer::new(provider.clone());

            let err = issuer.issue(request(json!(20))).await.unwrap_err();

            match err {
                IssueError::Provider { step: failed, source } => {
                    assert_eq!(failed, step);
                    assert_eq!(source.message, format!("{step} exploded"));
                }
                IssueError::Validation(v) => panic!("unexpected validation error: {v}"),
            }
            assert_eq!(provider.calls().last(), Some(&last_call));
        }
    }
}
