//! Response types for the relay API.

use serde::Serialize;

/// Response from the health endpoint.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_secs: u64,
    pub requests: u64,
    pub webhook_timeout_secs: u64,
}
