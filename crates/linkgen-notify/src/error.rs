//! Notification Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, NotifyError>;

/// Notification-related errors
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Messaging provider rejected or failed the send
    #[error("Twilio error: {0}")]
    Provider(String),

    /// Network failure reaching the provider
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Provider response could not be parsed
    #[error("Response parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
