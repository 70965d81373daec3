//! Twilio Gateway
//!
//! `SmsGateway` implementation over the Twilio REST API. One form-encoded
//! POST per message; the account SID doubles as the basic-auth username.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{NotifyError, Result};
use crate::gateway::{SmsGateway, SmsReceipt};

const DEFAULT_API_BASE: &str = "https://api.twilio.com";

/// Twilio account configuration
#[derive(Clone, Debug)]
pub struct TwilioConfig {
    /// Account SID (basic-auth username)
    pub account_sid: String,

    /// Auth token (basic-auth password)
    pub auth_token: String,

    /// API base URL (overridable for tests)
    pub api_base: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TwilioConfig {
    pub fn new(account_sid: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            api_base: DEFAULT_API_BASE.into(),
            timeout_secs: 30,
        }
    }

    /// Build from environment variables. Fails when credentials are
    /// missing so that misconfiguration is caught at process start.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let account_sid = lookup("TWILIO_ACCOUNT_SID")
            .ok_or_else(|| NotifyError::Config("TWILIO_ACCOUNT_SID not set".into()))?;
        let auth_token = lookup("TWILIO_AUTH_TOKEN")
            .ok_or_else(|| NotifyError::Config("TWILIO_AUTH_TOKEN not set".into()))?;

        Ok(Self::new(account_sid, auth_token))
    }
}

/// Twilio SMS gateway
pub struct TwilioGateway {
    client: reqwest::Client,
    config: TwilioConfig,
}

/// Successful create-message response (fields we use)
#[derive(Deserialize)]
struct MessageResponse {
    sid: String,
}

/// Error payload Twilio returns on non-2xx responses
#[derive(Deserialize)]
struct TwilioErrorBody {
    message: Option<String>,
}

impl TwilioGateway {
    /// Create from configuration
    pub fn from_config(config: TwilioConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NotifyError::Config(format!("HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(TwilioConfig::from_env()?)
    }

    fn messages_endpoint(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_base.trim_end_matches('/'),
            self.config.account_sid
        )
    }
}

#[async_trait]
impl SmsGateway for TwilioGateway {
    async fn send_sms(&self, to: &str, from: &str, body: &str) -> Result<SmsReceipt> {
        let form = [("To", to), ("From", from), ("Body", body)];

        let response = self
            .client
            .post(self.messages_endpoint())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // Prefer Twilio's own error message over the raw body.
            let detail = serde_json::from_str::<TwilioErrorBody>(&text)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or(text);
            return Err(NotifyError::Provider(format!("({}) {}", status, detail)));
        }

        let message: MessageResponse = serde_json::from_str(&text)?;

        tracing::info!(sid = %message.sid, %to, "Sent SMS notification");

        Ok(SmsReceipt {
            sid: message.sid,
            to: to.to_string(),
            from: from.to_string(),
        })
    }

    fn name(&self) -> &str {
        "twilio"
    }
}
