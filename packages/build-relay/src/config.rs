//! Relay configuration.

use serde::Deserialize;

/// Configuration for the build relay.
///
/// Loaded once at startup from `relay.toml` and `RELAY_*` environment
/// variables, then injected into [`crate::AppState`].
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "defaults::bind_address")]
    pub bind_address: String,

    /// Chat webhook URL. Takes precedence over `webhook_secret_name`.
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Secret Manager resource holding the webhook URL
    /// (`projects/<p>/secrets/<s>[/versions/<v>]`).
    #[serde(default = "defaults::webhook_secret_name")]
    pub webhook_secret_name: Option<String>,

    #[serde(default = "defaults::webhook_timeout_secs")]
    pub webhook_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: defaults::bind_address(),
            webhook_url: None,
            webhook_secret_name: defaults::webhook_secret_name(),
            webhook_timeout_secs: defaults::webhook_timeout_secs(),
        }
    }
}

impl Config {
    /// Load from the optional `relay` config file and `RELAY_*` env vars.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::layered(
            config::File::with_name("relay").required(false),
            config::Environment::with_prefix("RELAY"),
        )
    }

    /// Environment values override the file.
    fn layered<F>(file: F, env: config::Environment) -> Result<Self, config::ConfigError>
    where
        F: config::Source + Send + Sync + 'static,
    {
        config::Config::builder()
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()
    }
}

mod defaults {
    pub fn bind_address() -> String {
        // Cloud Run and Cloud Functions inject the port to listen on.
        match std::env::var("PORT") {
            Ok(port) if !port.is_empty() => format!("0.0.0.0:{port}"),
            _ => "0.0.0.0:8080".into(),
        }
    }

    pub fn webhook_secret_name() -> Option<String> {
        std::env::var("WEBHOOK_SECRET_NAME")
            .ok()
            .filter(|name| !name.is_empty())
    }

    pub fn webhook_timeout_secs() -> u64 {
        10
    }
}
