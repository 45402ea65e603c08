//! # Build Relay
//!
//! Relays Cloud Build status events, delivered by a Pub/Sub push
//! subscription, to a chat webhook as a one-line summary. Builds that are
//! still queued or running are acknowledged without notifying.
//!
//! ## Quick Start
//! ```bash
//! RELAY_WEBHOOK_URL=https://discord.com/api/webhooks/... cargo run --bin build-relay
//! ```
//!
//! ## Endpoints
//! - `POST /` - Pub/Sub push endpoint (202 delivered, 204 filtered, 500 failed)
//! - `GET /health` - Health check
//! - `GET /metrics` - Prometheus metrics

pub mod build_event;
pub mod config;
pub mod envelope;
mod error;
mod handlers;
mod metrics;
mod middleware;
pub mod notification;
pub mod relay;
mod response;
mod router;
pub mod secrets;
mod state;
pub mod webhook;

pub use config::Config;
pub use error::Error;
pub use relay::Outcome;
pub use router::create as create_router;
pub use state::AppState;
