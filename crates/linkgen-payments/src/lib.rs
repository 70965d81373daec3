//! # linkgen-payments
//!
//! Payments-provider integration for linkgen.
//!
//! The provider is reached through exactly three actions, in dependency
//! order:
//!
//! ```text
//! create_product ──▶ create_price ──▶ create_payment_link
//!     (id)              (id)             (url)
//! ```
//!
//! Each step's ID is a precondition for the next; none of the steps is
//! idempotent, so repeated runs create fresh provider-side entities.
//!
//! The `PaymentsGateway` trait abstracts the provider so handlers and the
//! planner can be exercised against `MockPaymentsGateway` in tests, while
//! production wires in `StripeGateway`.
//!
//! `planner` holds the LLM-facing half: the three `Tool` bindings, the
//! prompt text that instructs the model to call them in order, and the
//! `generate_payment_link` entry point. Ordering is a soft contract
//! carried by the prompt, not enforced structurally.

mod error;
mod gateway;
mod planner;
mod stripe_gateway;
mod tools;

pub use error::{PaymentError, Result};
pub use gateway::{
    FailingStep, MockPaymentsGateway, PaymentLinkRecord, PaymentsGateway, PriceRecord,
    ProductRecord,
};
pub use planner::{generate_payment_link, payment_tools, PLANNER_SYSTEM_PROMPT};
pub use stripe_gateway::StripeGateway;
pub use tools::{CreatePaymentLinkTool, CreatePriceTool, CreateProductTool};
