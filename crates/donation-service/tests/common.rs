//! Common test utilities for donation-service integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum_test::TestServer;

use donation_core::{
    CustomerRecord, InvoiceRecord, NewInvoice, NewLineItem, ProviderError, WorkflowStep,
};
use donation_service::{create_router, AppState, InvoiceProvider, ServiceConfig};

/// In-memory billing provider.
///
/// Customers are keyed by email; every invoice gets a fresh ID.
#[derive(Default)]
pub struct FakeProvider {
    customers: Mutex<Vec<CustomerRecord>>,
    line_items: Mutex<Vec<NewLineItem>>,
    invoices: Mutex<Vec<NewInvoice>>,
    next_id: AtomicUsize,
    calls: AtomicUsize,
    fail_at: Mutex<Option<(WorkflowStep, String)>>,
    delay: Mutex<Option<Duration>>,
    omit_hosted_url: AtomicBool,
}

impl FakeProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Seed an existing customer.
    pub fn with_customer(self: Arc<Self>, id: &str, email: &str) -> Arc<Self> {
        self.customers.lock().unwrap().push(CustomerRecord {
            id: id.to_string(),
            email: Some(email.to_string()),
        });
        self
    }

    /// Make the given step fail with a message.
    pub fn fail_at(&self, step: WorkflowStep, message: &str) {
        *self.fail_at.lock().unwrap() = Some((step, message.to_string()));
    }

    /// Sleep before answering every call.
    pub fn with_delay(self: Arc<Self>, delay: Duration) -> Arc<Self> {
        *self.delay.lock().unwrap() = Some(delay);
        self
    }

    /// Finalize invoices without a hosted page URL.
    pub fn without_hosted_url(self: Arc<Self>) -> Arc<Self> {
        self.omit_hosted_url.store(true, Ordering::SeqCst);
        self
    }

    /// Number of provider calls made.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn customer_count(&self) -> usize {
        self.customers.lock().unwrap().len()
    }

    pub fn line_items(&self) -> Vec<NewLineItem> {
        self.line_items.lock().unwrap().clone()
    }

    pub fn invoices(&self) -> Vec<NewInvoice> {
        self.invoices.lock().unwrap().clone()
    }

    async fn enter(&self, step: WorkflowStep) -> Result<(), ProviderError> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.calls.fetch_add(1, Ordering::SeqCst);
        match &*self.fail_at.lock().unwrap() {
            Some((failing, message)) if *failing == step => {
                Err(ProviderError::new(message.clone()))
            }
            _ => Ok(()),
        }
    }

    fn next_id(&self, prefix: &str) -> String {
        format!("{prefix}_{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

#[async_trait]
impl InvoiceProvider for FakeProvider {
    async fn find_customer_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CustomerRecord>, ProviderError> {
        self.enter(WorkflowStep::ResolveCustomer).await?;
        Ok(self
            .customers
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.email.as_deref() == Some(email))
            .cloned())
    }

    async fn create_customer(&self, email: &str) -> Result<CustomerRecord, ProviderError> {
        self.enter(WorkflowStep::ResolveCustomer).await?;
        let customer = CustomerRecord {
            id: self.next_id("cus"),
            email: Some(email.to_string()),
        };
        self.customers.lock().unwrap().push(customer.clone());
        Ok(customer)
    }

    async fn create_invoice(&self, invoice: &NewInvoice) -> Result<InvoiceRecord, ProviderError> {
        self.enter(WorkflowStep::CreateInvoice).await?;
        self.invoices.lock().unwrap().push(invoice.clone());
        Ok(InvoiceRecord {
            id: self.next_id("in"),
            status: Some("draft".into()),
            hosted_invoice_url: None,
        })
    }

    async fn add_line_item(&self, item: &NewLineItem) -> Result<(), ProviderError> {
        self.enter(WorkflowStep::AttachLineItem).await?;
        self.line_items.lock().unwrap().push(item.clone());
        Ok(())
    }

    async fn finalize_invoice(&self, invoice_id: &str) -> Result<InvoiceRecord, ProviderError> {
        self.enter(WorkflowStep::FinalizeInvoice).await?;
        let hosted_invoice_url = (!self.omit_hosted_url.load(Ordering::SeqCst))
            .then(|| format!("https://invoice.stripe.com/i/{invoice_id}"));
        Ok(InvoiceRecord {
            id: invoice_id.to_string(),
            status: Some("open".into()),
            hosted_invoice_url,
        })
    }
}

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// The provider behind the server.
    pub provider: Arc<FakeProvider>,
}

impl TestHarness {
    /// Create a harness with an empty provider.
    pub fn new() -> Self {
        Self::with_provider(FakeProvider::new())
    }

    /// Create a harness over a prepared provider.
    pub fn with_provider(provider: Arc<FakeProvider>) -> Self {
        let config = ServiceConfig {
            host: "127.0.0.1".into(),
            port: 0,
            stripe_secret_key: "sk_test_unused".into(),
            ..ServiceConfig::default()
        };

        let state = AppState::new(config, provider.clone());
        let server = TestServer::new(create_router(state)).expect("Failed to create test server");

        Self { server, provider }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
