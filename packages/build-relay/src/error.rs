//! Error types for the relay.

use std::fmt;

/// Relay error type.
///
/// Per-request variants are mapped to `500` by [`crate::Outcome`]; the
/// configuration variants only occur during startup.
#[derive(Debug)]
pub enum Error {
    /// Request body is not a push envelope (invalid JSON or missing `message`/`data`).
    MalformedEnvelope(String),
    /// `message.data` is not valid base64.
    MalformedPayload(String),
    /// Decoded payload is not a JSON object at all.
    DecodeBuildEvent(String),
    /// Webhook answered something other than 204, or the call itself failed.
    DeliveryFailed(String),
    /// No usable webhook URL could be resolved at startup.
    ConfigurationMissing(String),
    /// Secret Manager lookup failed.
    Secret(String),
}

impl Error {
    /// Stable label used in log records and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::MalformedEnvelope(_) => "malformed_envelope",
            Error::MalformedPayload(_) => "malformed_payload",
            Error::DecodeBuildEvent(_) => "decode_build_event",
            Error::DeliveryFailed(_) => "delivery_failed",
            Error::ConfigurationMissing(_) => "configuration_missing",
            Error::Secret(_) => "secret",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedEnvelope(msg) => write!(f, "malformed push envelope: {msg}"),
            Error::MalformedPayload(msg) => write!(f, "malformed message data: {msg}"),
            Error::DecodeBuildEvent(msg) => write!(f, "could not decode build event: {msg}"),
            Error::DeliveryFailed(msg) => write!(f, "webhook delivery failed: {msg}"),
            Error::ConfigurationMissing(msg) => write!(f, "configuration missing: {msg}"),
            Error::Secret(msg) => write!(f, "secret error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
