//! Application state shared across handlers.

use crate::config::Config;
use crate::webhook::WebhookClient;
use std::time::{Duration, Instant};
use tracing::info;

/// Shared application state. Nothing in here changes a relay decision.
pub struct AppState {
    pub config: Config,
    pub webhook: WebhookClient,
    pub start_time: Instant,
}

impl AppState {
    /// Build state around an already-resolved webhook URL.
    pub fn new(config: Config, webhook_url: &str) -> Result<Self, crate::Error> {
        let webhook = WebhookClient::new(
            webhook_url,
            Duration::from_secs(config.webhook_timeout_secs),
        )?;

        info!(timeout_secs = config.webhook_timeout_secs, "Webhook client ready");

        Ok(Self {
            config,
            webhook,
            start_time: Instant::now(),
        })
    }
}
