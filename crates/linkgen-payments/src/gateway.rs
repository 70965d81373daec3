//! Payments Gateway
//!
//! Abstraction over the payments provider plus a mock for tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::error::{PaymentError, Result};

/// Provider-issued product entity
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

/// Provider-issued price entity, referencing a product
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PriceRecord {
    pub id: String,
    pub product_id: String,
    pub currency: String,
    pub unit_amount: i64,
}

/// Provider-hosted checkout link, referencing a price
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaymentLinkRecord {
    pub id: String,
    pub price_id: String,
    pub url: String,
}

/// Payments gateway trait (Strategy pattern)
///
/// Implement this per provider. The three actions must be called in
/// dependency order; the gateway itself does not enforce that.
#[async_trait]
pub trait PaymentsGateway: Send + Sync {
    /// Create a product
    async fn create_product(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<ProductRecord>;

    /// Create a price for an existing product. `unit_amount` is in the
    /// currency's smallest unit (cents for USD).
    async fn create_price(
        &self,
        product_id: &str,
        currency: &str,
        unit_amount: i64,
    ) -> Result<PriceRecord>;

    /// Create a payment link for an existing price
    async fn create_payment_link(
        &self,
        price_id: &str,
        quantity: u64,
    ) -> Result<PaymentLinkRecord>;

    /// Gateway name
    fn name(&self) -> &str;
}

/// Which of the three provider actions a mock should fail on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailingStep {
    Product,
    Price,
    PaymentLink,
}

/// Mock payments gateway
///
/// Issues sequential IDs (`prod_1`, `price_1`, `plink_1`, ...) so tests can
/// assert that repeated requests create distinct provider-side entities.
/// Optionally fails on a chosen step to exercise error paths.
pub struct MockPaymentsGateway {
    counter: AtomicU64,
    fail_on: Option<FailingStep>,
    created: Mutex<Vec<String>>,
}

impl Default for MockPaymentsGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPaymentsGateway {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
            fail_on: None,
            created: Mutex::new(Vec::new()),
        }
    }

    /// Fail with a Stripe-shaped error when the given step is attempted
    pub fn failing_on(step: FailingStep) -> Self {
        Self {
            fail_on: Some(step),
            ..Self::new()
        }
    }

    fn next_id(&self, prefix: &str) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}_{}", prefix, n)
    }

    fn record(&self, id: &str) {
        self.created.lock().unwrap().push(id.to_string());
    }

    /// IDs of every entity created through this mock, in creation order
    pub fn created_ids(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentsGateway for MockPaymentsGateway {
    async fn create_product(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<ProductRecord> {
        if self.fail_on == Some(FailingStep::Product) {
            return Err(PaymentError::Stripe("product creation failed".into()));
        }
        let id = self.next_id("prod");
        self.record(&id);
        Ok(ProductRecord {
            id,
            name: name.to_string(),
            description: description.map(str::to_string),
        })
    }

    async fn create_price(
        &self,
        product_id: &str,
        currency: &str,
        unit_amount: i64,
    ) -> Result<PriceRecord> {
        if self.fail_on == Some(FailingStep::Price) {
            return Err(PaymentError::Stripe("price creation failed".into()));
        }
        if unit_amount <= 0 {
            return Err(PaymentError::InvalidArgument(format!(
                "unit_amount must be positive, got {}",
                unit_amount
            )));
        }
        let id = self.next_id("price");
        self.record(&id);
        Ok(PriceRecord {
            id,
            product_id: product_id.to_string(),
            currency: currency.to_string(),
            unit_amount,
        })
    }

    async fn create_payment_link(
        &self,
        price_id: &str,
        _quantity: u64,
    ) -> Result<PaymentLinkRecord> {
        if self.fail_on == Some(FailingStep::PaymentLink) {
            return Err(PaymentError::Stripe("payment link creation failed".into()));
        }
        let id = self.next_id("plink");
        self.record(&id);
        Ok(PaymentLinkRecord {
            url: format!("https://buy.stripe.test/{}", id),
            id,
            price_id: price_id.to_string(),
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_issues_sequential_ids() {
        let gateway = MockPaymentsGateway::new();

        let product = gateway.create_product("Widget", None).await.unwrap();
        let price = gateway.create_price(&product.id, "usd", 1500).await.unwrap();
        let link = gateway.create_payment_link(&price.id, 1).await.unwrap();

        assert_eq!(product.id, "prod_1");
        assert_eq!(price.id, "price_2");
        assert_eq!(price.product_id, "prod_1");
        assert_eq!(link.price_id, "price_2");
        assert!(link.url.contains("plink_3"));
        assert_eq!(gateway.created_ids(), vec!["prod_1", "price_2", "plink_3"]);
    }

    #[tokio::test]
    async fn test_mock_failure_injection() {
        let gateway = MockPaymentsGateway::failing_on(FailingStep::Price);

        let product = gateway.create_product("Widget", None).await.unwrap();
        let err = gateway.create_price(&product.id, "usd", 1500).await.unwrap_err();
        assert!(matches!(err, PaymentError::Stripe(_)));
        // No rollback: the product stays created.
        assert_eq!(gateway.created_ids(), vec!["prod_1"]);
    }

    #[tokio::test]
    async fn test_mock_rejects_non_positive_amount() {
        let gateway = MockPaymentsGateway::new();
        let err = gateway.create_price("prod_1", "usd", 0).await.unwrap_err();
        assert!(matches!(err, PaymentError::InvalidArgument(_)));
    }
}
