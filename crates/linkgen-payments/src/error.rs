//! Payment Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment-related errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Stripe API error
    #[error("Stripe error: {0}")]
    Stripe(String),

    /// Invalid argument passed to a provider action
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Planner (LLM tool-call loop) failed
    #[error("Planner error: {0}")]
    Planner(String),

    /// Planner final answer missing or malformed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<linkgen_core::AgentError> for PaymentError {
    fn from(err: linkgen_core::AgentError) -> Self {
        PaymentError::Planner(err.to_string())
    }
}
