//! Outbound SMS through the telephony provider's REST API.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use gigi_core::{SmsError, SmsSender};

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TelephonyClient {
    client: Client,
    base_url: String,
    from_number: String,
    api_token: String,
}

impl TelephonyClient {
    pub fn new(base_url: String, from_number: String, api_token: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            from_number,
            api_token,
        }
    }
}

#[async_trait]
impl SmsSender for TelephonyClient {
    async fn send(&self, to: &str, body: &str) -> Result<(), SmsError> {
        let url = format!("{}/messages", self.base_url);
        debug!(to, len = body.len(), "sending outbound sms");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .timeout(SEND_TIMEOUT)
            .json(&json!({
                "from": self.from_number,
                "to": to,
                "text": body,
            }))
            .send()
            .await
            .map_err(|e| SmsError::Send(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(SmsError::Send(format!("{status}: {text}")));
        }

        Ok(())
    }
}
