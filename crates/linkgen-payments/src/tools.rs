//! Payment Tools
//!
//! The three provider actions exposed to the planner. Tool names match the
//! instructions in the planner prompt (`create_product`, `create_price`,
//! `create_payment_link`); each tool reports the created entity's ID in its
//! output so the model can thread it into the next call.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use linkgen_core::{
    tool::ParameterSchema,
    Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema,
};

use crate::gateway::PaymentsGateway;

/// Creates a product at the payments provider
pub struct CreateProductTool {
    gateway: Arc<dyn PaymentsGateway>,
}

impl CreateProductTool {
    pub fn new(gateway: Arc<dyn PaymentsGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Tool for CreateProductTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_product".into(),
            description: "Create a product at the payments provider. Returns the product ID needed by create_price.".into(),
            parameters: vec![
                ParameterSchema {
                    name: "name".into(),
                    param_type: "string".into(),
                    description: "Short product name".into(),
                    required: true,
                    default: None,
                },
                ParameterSchema {
                    name: "description".into(),
                    param_type: "string".into(),
                    description: "Longer product description".into(),
                    required: false,
                    default: None,
                },
            ],
            has_side_effects: true,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let name = call.str_arg("name").unwrap_or("Product");
        let description = call.str_arg("description");

        match self.gateway.create_product(name, description).await {
            Ok(product) => Ok(ToolResult::success(
                "create_product",
                format!("Created product '{}' with id {}", product.name, product.id),
            )
            .with_data(json!({"id": product.id}))),
            Err(e) => Ok(ToolResult::failure("create_product", e.to_string())),
        }
    }
}

/// Creates a price referencing an existing product
pub struct CreatePriceTool {
    gateway: Arc<dyn PaymentsGateway>,
}

impl CreatePriceTool {
    pub fn new(gateway: Arc<dyn PaymentsGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Tool for CreatePriceTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_price".into(),
            description: "Create a price for an existing product. Returns the price ID needed by create_payment_link.".into(),
            parameters: vec![
                ParameterSchema {
                    name: "product".into(),
                    param_type: "string".into(),
                    description: "Product ID returned by create_product".into(),
                    required: true,
                    default: None,
                },
                ParameterSchema {
                    name: "unit_amount".into(),
                    param_type: "number".into(),
                    description: "Amount in the currency's smallest unit (cents for USD)".into(),
                    required: true,
                    default: None,
                },
                ParameterSchema {
                    name: "currency".into(),
                    param_type: "string".into(),
                    description: "Three-letter ISO currency code".into(),
                    required: false,
                    default: Some(json!("usd")),
                },
            ],
            has_side_effects: true,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let Some(product_id) = call.str_arg("product") else {
            return Ok(ToolResult::failure("create_price", "Missing product ID"));
        };
        let Some(unit_amount) = call.int_arg("unit_amount") else {
            return Ok(ToolResult::failure("create_price", "Missing or non-numeric unit_amount"));
        };
        let currency = call.str_arg("currency").unwrap_or("usd");

        match self.gateway.create_price(product_id, currency, unit_amount).await {
            Ok(price) => Ok(ToolResult::success(
                "create_price",
                format!(
                    "Created price {} ({} {}) for product {}",
                    price.id, price.unit_amount, price.currency, price.product_id
                ),
            )
            .with_data(json!({"id": price.id}))),
            Err(e) => Ok(ToolResult::failure("create_price", e.to_string())),
        }
    }
}

/// Creates a payment link referencing an existing price
pub struct CreatePaymentLinkTool {
    gateway: Arc<dyn PaymentsGateway>,
}

impl CreatePaymentLinkTool {
    pub fn new(gateway: Arc<dyn PaymentsGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Tool for CreatePaymentLinkTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_payment_link".into(),
            description: "Create a hosted payment link for an existing price. Returns the checkout URL.".into(),
            parameters: vec![
                ParameterSchema {
                    name: "price".into(),
                    param_type: "string".into(),
                    description: "Price ID returned by create_price".into(),
                    required: true,
                    default: None,
                },
                ParameterSchema {
                    name: "quantity".into(),
                    param_type: "number".into(),
                    description: "Line item quantity".into(),
                    required: false,
                    default: Some(json!(1)),
                },
            ],
            has_side_effects: true,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let Some(price_id) = call.str_arg("price") else {
            return Ok(ToolResult::failure("create_payment_link", "Missing price ID"));
        };
        let quantity = call.int_arg("quantity").map_or(1, |q| q.max(1) as u64);

        match self.gateway.create_payment_link(price_id, quantity).await {
            Ok(link) => Ok(ToolResult::success(
                "create_payment_link",
                format!("Created payment link: {}", link.url),
            )
            .with_data(json!({"id": link.id, "url": link.url}))),
            Err(e) => Ok(ToolResult::failure("create_payment_link", e.to_string())),
        }
    }
}
