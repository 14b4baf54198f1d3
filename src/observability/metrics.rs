//! Internal delivery counters.
//!
//! # Metrics
//! - `bridge_notices_submitted_total` (counter): notices accepted into a notifier
//! - `bridge_notices_dropped_total` (counter): notices dropped before delivery, by reason
//! - `bridge_deliveries_total` (counter): finished deliveries by kind, outcome
//! - `bridge_queue_metrics_total` (counter): finalized job metrics by errored flag
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; no-ops until the host installs a recorder
//! - Label values are static strings to keep cardinality fixed

use metrics::counter;

pub fn record_notice_submitted() {
    counter!("bridge_notices_submitted_total").increment(1);
}

pub fn record_notice_dropped(reason: &'static str) {
    counter!("bridge_notices_dropped_total", "reason" => reason).increment(1);
}

pub fn record_delivery(kind: &'static str, outcome: &'static str) {
    counter!("bridge_deliveries_total", "kind" => kind, "outcome" => outcome).increment(1);
}

pub fn record_queue_metric(errored: bool) {
    let errored = if errored { "true" } else { "false" };
    counter!("bridge_queue_metrics_total", "errored" => errored).increment(1);
}
