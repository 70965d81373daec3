//! SMS Gateway
//!
//! Abstraction over the messaging provider plus a mock for tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::error::{NotifyError, Result};

/// Receipt for one outbound message, owned by the provider once sent
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SmsReceipt {
    /// Provider-assigned message identifier
    pub sid: String,

    /// Destination number
    pub to: String,

    /// Sender number
    pub from: String,
}

/// SMS gateway trait (Strategy pattern)
#[async_trait]
pub trait SmsGateway: Send + Sync {
    /// Send a single SMS, returning the provider receipt
    async fn send_sms(&self, to: &str, from: &str, body: &str) -> Result<SmsReceipt>;

    /// Gateway name
    fn name(&self) -> &str;
}

/// A message captured by the mock gateway
#[derive(Clone, Debug)]
pub struct SentSms {
    pub to: String,
    pub from: String,
    pub body: String,
}

/// Mock SMS gateway
///
/// Captures outbound messages and issues sequential SIDs. Can be
/// constructed to fail with a fixed error text to exercise error paths.
pub struct MockSmsGateway {
    counter: AtomicU64,
    fail_with: Option<String>,
    sent: Mutex<Vec<SentSms>>,
}

impl Default for MockSmsGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSmsGateway {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
            fail_with: None,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Every send fails with the given provider error text
    pub fn failing_with(error: impl Into<String>) -> Self {
        Self {
            fail_with: Some(error.into()),
            ..Self::new()
        }
    }

    /// Messages sent through this mock, in order
    pub fn sent(&self) -> Vec<SentSms> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl SmsGateway for MockSmsGateway {
    async fn send_sms(&self, to: &str, from: &str, body: &str) -> Result<SmsReceipt> {
        if let Some(ref error) = self.fail_with {
            return Err(NotifyError::Provider(error.clone()));
        }

        self.sent.lock().unwrap().push(SentSms {
            to: to.to_string(),
            from: from.to_string(),
            body: body.to_string(),
        });

        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(SmsReceipt {
            sid: format!("SM{:032x}", n),
            to: to.to_string(),
            from: from.to_string(),
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
    async fn test_mock_captures_messages_and_issues_sids() {
        let gateway = MockSmsGateway::new();

        let receipt = gateway
            .send_sms("+15551234567", "+15557654321", "hello")
            .await
            .unwrap();
        assert!(receipt.sid.starts_with("SM"));

        let sent = gateway.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body, "hello");
        assert_eq!(sent[0].to, "+15551234567");
    }

    #[tokio::test]
    async fn test_mock_failure_carries_error_text() {
        let gateway = MockSmsGateway::failing_with("invalid credentials");
        let err = gateway
            .send_sms("+15551234567", "+15557654321", "hello")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Twilio error: invalid credentials");
        assert!(gateway.sent().is_empty());
    }
}
