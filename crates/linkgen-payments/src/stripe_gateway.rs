//! Stripe Gateway
//!
//! `PaymentsGateway` implementation over the Stripe API. Each action maps
//! to exactly one Stripe create call; IDs thread from step to step through
//! the caller (the planner), not through any state held here.

use async_trait::async_trait;
use stripe::{
    Client, CreatePaymentLink, CreatePaymentLinkLineItems, CreatePrice, CreateProduct, Currency,
    IdOrCreate, PaymentLink, Price, Product,
};

use crate::error::{PaymentError, Result};
use crate::gateway::{PaymentLinkRecord, PaymentsGateway, PriceRecord, ProductRecord};

/// Stripe client wrapper
pub struct StripeGateway {
    client: Client,
}

impl std::fmt::Debug for StripeGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeGateway").finish_non_exhaustive()
    }
}

impl StripeGateway {
    /// Create a new Stripe gateway
    pub fn new(secret_key: &str) -> Self {
        Self {
            client: Client::new(secret_key),
        }
    }

    /// Create from environment variables. Fails when `STRIPE_SECRET_KEY`
    /// is missing so that misconfiguration is caught at process start.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let secret_key = lookup("STRIPE_SECRET_KEY")
            .ok_or_else(|| PaymentError::Config("STRIPE_SECRET_KEY not set".into()))?;

        Ok(Self::new(&secret_key))
    }
}

fn line_item(price_id: &str, quantity: u64) -> CreatePaymentLinkLineItems {
    CreatePaymentLinkLineItems {
        quantity,
        price: price_id.to_string(),
        adjustable_quantity: None,
    }
}

#[async_trait]
impl PaymentsGateway for StripeGateway {
    async fn create_product(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<ProductRecord> {
        let mut params = CreateProduct::new(name);
        params.description = description;

        let product = Product::create(&self.client, params)
            .await
            .map_err(|e| PaymentError::Stripe(e.to_string()))?;

        tracing::debug!(product_id = %product.id, "Created Stripe product");

        Ok(ProductRecord {
            id: product.id.to_string(),
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
        if unit_amount <= 0 {
            return Err(PaymentError::InvalidArgument(format!(
                "unit_amount must be positive, got {}",
                unit_amount
            )));
        }

        let parsed_currency = currency
            .to_lowercase()
            .parse::<Currency>()
            .map_err(|_| PaymentError::InvalidArgument(format!("unknown currency: {}", currency)))?;

        let mut params = CreatePrice::new(parsed_currency);
        params.product = Some(IdOrCreate::Id(product_id));
        params.unit_amount = Some(unit_amount);

        let price = Price::create(&self.client, params)
            .await
            .map_err(|e| PaymentError::Stripe(e.to_string()))?;

        tracing::debug!(price_id = %price.id, %product_id, "Created Stripe price");

        Ok(PriceRecord {
            id: price.id.to_string(),
            product_id: product_id.to_string(),
            currency: currency.to_lowercase(),
            unit_amount,
        })
    }

    async fn create_payment_link(
        &self,
        price_id: &str,
        quantity: u64,
    ) -> Result<PaymentLinkRecord> {
        let params = CreatePaymentLink::new(vec![line_item(price_id, quantity)]);

        let link = PaymentLink::create(&self.client, params)
            .await
            .map_err(|e| PaymentError::Stripe(e.to_string()))?;

        tracing::debug!(link_id = %link.id, %price_id, "Created Stripe payment link");

        Ok(PaymentLinkRecord {
            id: link.id.to_string(),
            price_id: price_id.to_string(),
            url: link.url,
        })
    }

    fn name(&self) -> &str {
        "stripe"
    }
}
