//! Application State

use std::sync::Arc;

use linkgen_core::LlmProvider;
use linkgen_notify::SmsGateway;
use linkgen_payments::PaymentsGateway;

/// Fixed sender/recipient numbers for lead notifications
#[derive(Clone, Debug)]
pub struct NotifyNumbers {
    /// Twilio sender number
    pub from: String,

    /// Admin number receiving lead notifications
    pub to: String,
}

impl NotifyNumbers {
    /// Build from environment variables, failing when either is missing
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let from = lookup("TWILIO_PHONE_NUMBER")
            .ok_or_else(|| anyhow::anyhow!("TWILIO_PHONE_NUMBER not set"))?;
        let to = lookup("YOUR_PHONE_NUMBER")
            .ok_or_else(|| anyhow::anyhow!("YOUR_PHONE_NUMBER not set"))?;

        Ok(Self { from, to })
    }
}

/// Shared application state
///
/// Provider clients are constructed once at startup and injected here as
/// trait objects, so handlers can be exercised against test doubles.
#[derive(Clone)]
pub struct AppState {
    /// LLM provider driving the payment-link planner
    pub provider: Arc<dyn LlmProvider>,

    /// Payments gateway (Stripe in production)
    pub payments: Arc<dyn PaymentsGateway>,

    /// SMS gateway (Twilio in production)
    pub sms: Arc<dyn SmsGateway>,

    /// Notification sender/recipient numbers
    pub notify: NotifyNumbers,

    /// Model used by the planner
    pub model: String,
}
