//! HTTP request handlers.

use crate::metrics::METRICS;
use crate::middleware::RequestId;
use crate::relay::{self, Outcome};
use crate::response::HealthResponse;
use crate::state::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{error, info_span, Instrument};

/// Pub/Sub caps messages at 10 MB; base64 inflates that by a third.
const MAX_PUSH_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Health check with the push counter and webhook settings.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.start_time.elapsed().as_secs(),
        requests: METRICS.requests_total.load(Ordering::Relaxed),
        webhook_timeout_secs: state.config.webhook_timeout_secs,
    })
}

/// Prometheus metrics in text exposition format.
pub async fn metrics() -> impl IntoResponse {
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4",
        )],
        METRICS.render(),
    )
}

/// Relay one Pub/Sub push delivery to the chat webhook.
///
/// Answers 202 when delivered, 204 when the build is still in progress and
/// 500 on any failure so the subscription redelivers.
pub async fn push(State(state): State<Arc<AppState>>, request: axum::extract::Request) -> Outcome {
    let start = std::time::Instant::now();
    METRICS.requests_total.fetch_add(1, Ordering::Relaxed);

    let req_id = request
        .extensions()
        .get::<RequestId>()
        .cloned()
        .unwrap_or_default();
    let span = info_span!("push", req_id = %req_id.0);

    let outcome = async {
        let body = match axum::body::to_bytes(request.into_body(), MAX_PUSH_BODY_BYTES).await {
            Ok(body) => body,
            Err(e) => return Outcome::Failed(crate::Error::MalformedEnvelope(e.to_string())),
        };
        relay::relay(&state.webhook, &body).await
    }
    .instrument(span.clone())
    .await;

    if let Outcome::Failed(e) = &outcome {
        span.in_scope(|| error!(kind = e.kind(), error = %e, "Push request failed"));
    }
    METRICS.record_outcome(&outcome, start);
    outcome
}
