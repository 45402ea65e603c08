//! Prometheus metrics (lock-free atomics, zero allocation on hot path).

use crate::relay::Outcome;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

pub static METRICS: Metrics = Metrics::new();

pub struct Metrics {
    // --- Traffic ---
    pub requests_total: AtomicU64,
    pub delivered: AtomicU64,
    pub filtered: AtomicU64,

    // --- Failures by kind ---
    pub failed_envelope: AtomicU64,
    pub failed_payload: AtomicU64,
    pub failed_build_event: AtomicU64,
    pub failed_delivery: AtomicU64,

    // --- Latency (μs) ---
    pub duration_us_sum: AtomicU64,
}

impl Metrics {
    const fn new() -> Self {
        Self {
            requests_total: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            failed_envelope: AtomicU64::new(0),
            failed_payload: AtomicU64::new(0),
            failed_build_event: AtomicU64::new(0),
            failed_delivery: AtomicU64::new(0),
            duration_us_sum: AtomicU64::new(0),
        }
    }

    pub fn record_outcome(&self, outcome: &Outcome, start: Instant) {
        let counter = match outcome {
            Outcome::Delivered => &self.delivered,
            Outcome::Filtered => &self.filtered,
            Outcome::Failed(crate::Error::MalformedEnvelope(_)) => &self.failed_envelope,
            Outcome::Failed(crate::Error::MalformedPayload(_)) => &self.failed_payload,
            Outcome::Failed(crate::Error::DecodeBuildEvent(_)) => &self.failed_build_event,
            Outcome::Failed(_) => &self.failed_delivery,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        let us = start.elapsed().as_micros() as u64;
        self.duration_us_sum.fetch_add(us, Ordering::Relaxed);
    }

    /// Render in Prometheus text exposition format.
    pub fn render(&self) -> String {
        let requests = self.requests_total.load(Ordering::Relaxed);
        let delivered = self.delivered.load(Ordering::Relaxed);
        let filtered = self.filtered.load(Ordering::Relaxed);
        let envelope = self.failed_envelope.load(Ordering::Relaxed);
        let payload = self.failed_payload.load(Ordering::Relaxed);
        let build_event = self.failed_build_event.load(Ordering::Relaxed);
        let delivery = self.failed_delivery.load(Ordering::Relaxed);
        let dur_sum_s = self.duration_us_sum.load(Ordering::Relaxed) as f64 / 1_000_000.0;

        format!(
            "\
# HELP relay_requests_total Push requests received.\n\
# TYPE relay_requests_total counter\n\
relay_requests_total {requests}\n\
# HELP relay_delivered_total Notifications accepted by the webhook (HTTP 202).\n\
# TYPE relay_delivered_total counter\n\
relay_delivered_total {delivered}\n\
# HELP relay_filtered_total In-progress builds acknowledged without notifying (HTTP 204).\n\
# TYPE relay_filtered_total counter\n\
relay_filtered_total {filtered}\n\
# HELP relay_failed_total Failed push requests (HTTP 500).\n\
# TYPE relay_failed_total counter\n\
relay_failed_total{{kind=\"malformed_envelope\"}} {envelope}\n\
relay_failed_total{{kind=\"malformed_payload\"}} {payload}\n\
relay_failed_total{{kind=\"decode_build_event\"}} {build_event}\n\
relay_failed_total{{kind=\"delivery_failed\"}} {delivery}\n\
# HELP relay_delivery_duration_seconds_sum Total handler time (seconds).\n\
# TYPE relay_delivery_duration_seconds_sum counter\n\
relay_delivery_duration_seconds_sum {dur_sum_s:.6}\n"
        )
    }
}
