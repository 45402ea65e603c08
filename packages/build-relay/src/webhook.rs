//! Chat webhook client.

use crate::notification::ChatMessage;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Posts chat messages to a single configured webhook.
///
/// Holds no per-request state; one instance is shared by all handlers.
pub struct WebhookClient {
    http: reqwest::Client,
    url: String,
}

impl WebhookClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, crate::Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .build()
            .map_err(|e| crate::Error::ConfigurationMissing(format!("HTTP client build failed: {e}")))?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }

    /// POST the message as JSON. Only `204 No Content` counts as delivered.
    pub async fn deliver(&self, message: &ChatMessage) -> Result<(), crate::Error> {
        let response = self
            .http
            .post(&self.url)
            .json(message)
            .send()
            .await
            .map_err(|e| crate::Error::DeliveryFailed(format!("request failed: {e}")))?;

        let status = response.status();
        debug!(status = status.as_u16(), "Webhook responded");
        if status != StatusCode::NO_CONTENT {
            return Err(crate::Error::DeliveryFailed(format!(
                "webhook returned {}, expected {}",
                status.as_u16(),
                StatusCode::NO_CONTENT.as_u16()
            )));
        }
        Ok(())
    }
}
