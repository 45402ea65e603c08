//! Webhook URL resolution.
//!
//! Resolved once before the server starts. An explicit `webhook_url` wins;
//! otherwise `webhook_secret_name` is read from GCP Secret Manager (feature
//! `gcp`, Application Default Credentials).

use crate::config::Config;
use tracing::info;

/// Resolve the webhook URL or fail with `ConfigurationMissing`.
pub async fn resolve_webhook_url(config: &Config) -> Result<String, crate::Error> {
    if let Some(url) = config.webhook_url.as_deref().filter(|u| !u.trim().is_empty()) {
        info!("Using webhook URL from configuration");
        return validate_url(url.trim());
    }

    let Some(name) = config.webhook_secret_name.as_deref() else {
        return Err(crate::Error::ConfigurationMissing(
            "set RELAY_WEBHOOK_URL or WEBHOOK_SECRET_NAME".into(),
        ));
    };

    let url = fetch_secret(&secret_version_name(name)).await?;
    info!(secret = name, "Using webhook URL from Secret Manager");
    validate_url(url.trim())
}

/// Secret Manager version resource for a secret name; bare secrets read `latest`.
pub fn secret_version_name(name: &str) -> String {
    let name = name.trim().trim_end_matches('/');
    if name.contains("/versions/") {
        name.to_string()
    } else {
        format!("{name}/versions/latest")
    }
}

fn validate_url(url: &str) -> Result<String, crate::Error> {
    match reqwest::Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(url.to_string()),
        Ok(parsed) => Err(crate::Error::ConfigurationMissing(format!(
            "webhook URL must be http(s), got scheme {}",
            parsed.scheme()
        ))),
        Err(e) => Err(crate::Error::ConfigurationMissing(format!(
            "webhook URL is invalid: {e}"
        ))),
    }
}

#[cfg(not(feature = "gcp"))]
async fn fetch_secret(name: &str) -> Result<String, crate::Error> {
    Err(crate::Error::ConfigurationMissing(format!(
        "WEBHOOK_SECRET_NAME={name} requires the `gcp` feature; set RELAY_WEBHOOK_URL instead"
    )))
}

#[cfg(feature = "gcp")]
use inner::fetch_secret;

#[cfg(feature = "gcp")]
mod inner {
    use base64::{engine::general_purpose::STANDARD as B64, Engine};
    use google_cloud_auth::credentials::Builder;
    use serde::Deserialize;
    use std::time::Duration;

    const SECRET_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    #[derive(Deserialize)]
    struct AccessSecretVersionResponse {
        payload: SecretPayload,
    }

    #[derive(Deserialize)]
    struct SecretPayload {
        data: String,
    }

    /// Read a secret version's payload as UTF-8.
    pub async fn fetch_secret(name: &str) -> Result<String, crate::Error> {
        let credentials = Builder::default()
            .with_scopes(["https://www.googleapis.com/auth/cloud-platform"])
            .build_access_token_credentials()
            .map_err(|e| crate::Error::Secret(format!("GCP auth failed: {e}")))?;
        let token = credentials
            .access_token()
            .await
            .map_err(|e| crate::Error::Secret(format!("GCP token error: {e}")))?;

        let http = reqwest::Client::builder()
            .timeout(SECRET_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| crate::Error::Secret(format!("HTTP client build failed: {e}")))?;

        let url = format!("https://secretmanager.googleapis.com/v1/{name}:access");
        let response = http
            .get(&url)
            .bearer_auth(&token.token)
            .send()
            .await
            .map_err(|e| crate::Error::Secret(format!("Secret Manager request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(crate::Error::Secret(format!(
                "Secret Manager returned {status}: {body}"
            )));
        }

        let parsed: AccessSecretVersionResponse = response
            .json()
            .await
            .map_err(|e| crate::Error::Secret(format!("Invalid Secret Manager response: {e}")))?;
        let bytes = B64
            .decode(parsed.payload.data)
            .map_err(|e| crate::Error::Secret(format!("Invalid secret payload: {e}")))?;
        String::from_utf8(bytes)
            .map_err(|e| crate::Error::Secret(format!("Secret payload is not UTF-8: {e}")))
    }
}
