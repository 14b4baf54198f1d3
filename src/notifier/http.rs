//! HTTP notifier with a bounded background delivery queue.
//!
//! # Responsibilities
//! - Accept notices and queue metrics without blocking the caller
//! - Deliver them to the incident-tracking API from a background worker
//! - Retry transient failures and honor the remote rate limit
//! - Never surface delivery failures to the submitter

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::Semaphore;

use crate::config::{DeliveryConfig, NotifierConfig};
use crate::jobs::QueueMetric;
use crate::notice::Notice;
use crate::notifier::payload::{NoticePayload, QueueStatsPayload};
use crate::notifier::{check_metric, AsyncNotifier, NotifierError};
use crate::observability::metrics;
use crate::resilience::backoff::Backoff;
use crate::resilience::retries::{classify, Disposition, RateLimitWindow};

const WORKER_THREAD_NAME: &str = "incident-bridge-delivery";

/// A payload waiting for delivery.
#[derive(Debug)]
enum Outbound {
    Notice(Notice),
    Metric(QueueMetric),
}

impl Outbound {
    fn kind(&self) -> &'static str {
        match self {
            Outbound::Notice(_) => "notice",
            Outbound::Metric(_) => "queue_metric",
        }
    }
}

/// Notifier that posts to an Airbrake-compatible API.
pub struct HttpNotifier {
    tx: mpsc::Sender<Outbound>,
    rate_limit: Arc<RateLimitWindow>,
    notice_url: String,
}

impl HttpNotifier {
    /// Create the notifier and start its delivery worker.
    ///
    /// The worker runs on the current Tokio runtime when there is one,
    /// otherwise on a dedicated thread with its own runtime.
    pub fn new(notifier: &NotifierConfig, delivery: &DeliveryConfig) -> Result<Self, NotifierError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(delivery.timeout_secs))
            .build()?;

        let host = delivery.host.trim_end_matches('/');
        let notice_url = format!("{}/api/v3/projects/{}/notices", host, notifier.project_id);
        let queue_url = format!("{}/api/v5/projects/{}/queues-stats", host, notifier.project_id);

        let (tx, rx) = mpsc::channel(delivery.queue_capacity.max(1));
        let rate_limit = Arc::new(RateLimitWindow::new());
        let max_in_flight = delivery.max_in_flight.clamp(1, u32::MAX as usize);

        let worker = DeliveryWorker {
            client,
            notice_url: notice_url.clone(),
            queue_url,
            project_key: notifier.project_key.clone(),
            environment: notifier.environment.clone(),
            in_flight: Arc::new(Semaphore::new(max_in_flight)),
            max_in_flight,
            backoff: Backoff::from_config(delivery),
            max_attempts: delivery.max_attempts.max(1),
            rate_limit: rate_limit.clone(),
        };

        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(worker.run(rx));
            }
            Err(_) => {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()?;
                std::thread::Builder::new()
                    .name(WORKER_THREAD_NAME.to_string())
                    .spawn(move || runtime.block_on(worker.run(rx)))?;
            }
        }

        tracing::info!(
            endpoint = %notice_url,
            queue_capacity = delivery.queue_capacity,
            max_in_flight,
            "HTTP notifier started"
        );

        Ok(Self {
            tx,
            rate_limit,
            notice_url,
        })
    }

    fn submit(&self, item: Outbound) -> Result<(), NotifierError> {
        if let Some(secs) = self.rate_limit.remaining_secs() {
            return Err(NotifierError::RateLimited(secs));
        }
        self.tx.try_send(item).map_err(|e| match e {
            TrySendError::Full(_) => NotifierError::QueueFull,
            TrySendError::Closed(_) => NotifierError::Closed,
        })
    }
}

/// Permit count covering every in-flight slot, saturating at `u32::MAX`.
fn all_permits(max_in_flight: usize) -> u32 {
    u32::try_from(max_in_flight).unwrap_or(u32::MAX)
}

fn drop_reason(err: &NotifierError) -> &'static str {
    match err {
        NotifierError::QueueFull => "queue_full",
        NotifierError::RateLimited(_) => "rate_limited",
        NotifierError::Closed => "closed",
        _ => "other",
    }
}

impl AsyncNotifier for HttpNotifier {
    fn send_notice_async(&self, notice: Notice) {
        match self.submit(Outbound::Notice(notice)) {
            Ok(()) => metrics::record_notice_submitted(),
            Err(e) => {
                metrics::record_notice_dropped(drop_reason(&e));
                tracing::debug!(error = %e, "Notice dropped before delivery");
            }
        }
    }

    fn notify_queue_metric(&self, mut metric: QueueMetric) -> Result<(), NotifierError> {
        check_metric(&metric)?;
        metric.finish();
        self.submit(Outbound::Metric(metric))
    }
}

impl fmt::Debug for HttpNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpNotifier")
            .field("notice_url", &self.notice_url)
            .field("queue_capacity", &self.tx.max_capacity())
            .field("rate_limited", &self.rate_limit.is_open())
            .finish()
    }
}

struct DeliveryWorker {
    client: reqwest::Client,
    notice_url: String,
    queue_url: String,
    project_key: String,
    environment: String,
    in_flight: Arc<Semaphore>,
    max_in_flight: usize,
    backoff: Backoff,
    max_attempts: u32,
    rate_limit: Arc<RateLimitWindow>,
}

impl DeliveryWorker {
    async fn run(self, mut rx: mpsc::Receiver<Outbound>) {
        let worker = Arc::new(self);

        while let Some(item) = rx.recv().await {
            let permit = match worker.in_flight.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };
            let worker = worker.clone();
            tokio::spawn(async move {
                worker.deliver(item).await;
                drop(permit);
            });
        }

        // Every sender is gone: wait for in-flight deliveries before exiting
        let _ = worker.in_flight.acquire_many(all_permits(worker.max_in_flight)).await;
        tracing::debug!("Delivery worker stopped");
    }

    async fn deliver(&self, item: Outbound) {
        let kind = item.kind();
        let (url, body) = match &item {
            Outbound::Notice(notice) => (&self.notice_url, serde_json::to_vec(&NoticePayload::new(notice))),
            Outbound::Metric(metric) => (
                &self.queue_url,
                serde_json::to_vec(&QueueStatsPayload::new(&self.environment, metric)),
            ),
        };
        let body = match body {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(kind, error = %e, "Failed to serialize payload");
                metrics::record_delivery(kind, "serialize_error");
                return;
            }
        };

        let mut attempt = 0;
        loop {
            attempt += 1;

            if self.rate_limit.is_open() {
                metrics::record_delivery(kind, "rate_limited");
                return;
            }

            let response = self
                .client
                .post(url.as_str())
                .bearer_auth(&self.project_key)
                .header(CONTENT_TYPE, "application/json")
                .body(body.clone())
                .send()
                .await;

            let disposition = match response {
                Ok(response) => {
                    let status = response.status();
                    let disposition = classify(status, response.headers());
                    if disposition != Disposition::Delivered {
                        tracing::warn!(kind, attempt, status = %status, "Remote service rejected payload");
                    }
                    disposition
                }
                Err(e) => {
                    tracing::warn!(kind, attempt, error = %e, "Delivery request failed");
                    Disposition::Retry
                }
            };

            match disposition {
                Disposition::Delivered => {
                    metrics::record_delivery(kind, "delivered");
                    return;
                }
                Disposition::RateLimited(delay) => {
                    self.rate_limit.open_for(delay);
                    tracing::warn!(kind, delay = ?delay, "Rate limited by remote service");
                    metrics::record_delivery(kind, "rate_limited");
                    return;
                }
                Disposition::Drop => {
                    metrics::record_delivery(kind, "rejected");
                    return;
                }
                Disposition::Retry if attempt < self.max_attempts => {
                    let delay = self.backoff.delay(attempt);
                    tracing::debug!(kind, attempt, delay = ?delay, "Retrying delivery");
                    tokio::time::sleep(delay).await;
                }
                Disposition::Retry => {
                    tracing::warn!(kind, attempts = attempt, "Giving up on delivery");
                    metrics::record_delivery(kind, "failed");
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configs() -> (NotifierConfig, DeliveryConfig) {
        let notifier = NotifierConfig::new(1, "key", "test");
        let delivery = DeliveryConfig {
            // Nothing listens here; deliveries fail in the background
            host: "http://127.0.0.1:9".to_string(),
            queue_capacity: 2,
            max_in_flight: 1,
            max_attempts: 1,
            ..DeliveryConfig::default()
        };
        (notifier, delivery)
    }

    #[test]
    fn test_starts_outside_runtime() {
        let (notifier, delivery) = configs();
        let client = HttpNotifier::new(&notifier, &delivery).unwrap();
        client.send_notice_async(Notice::new("log", "hello"));
        assert!(format!("{:?}", client).contains("/api/v3/projects/1/notices"));
    }

    #[tokio::test]
    async fn test_rejects_unnamed_metric() {
        let (notifier, delivery) = configs();
        let client = HttpNotifier::new(&notifier, &delivery).unwrap();
        let err = client.notify_queue_metric(QueueMetric::new("")).unwrap_err();
        assert!(matches!(err, NotifierError::InvalidMetric(_)));
    }

    #[tokio::test]
    async fn test_rate_limit_window_rejects_submissions() {
        let (notifier, delivery) = configs();
        let client = HttpNotifier::new(&notifier, &delivery).unwrap();
        client.rate_limit.open_for(Duration::from_secs(30));

        let err = client.notify_queue_metric(QueueMetric::new("jobs")).unwrap_err();
        assert!(matches!(err, NotifierError::RateLimited(_)));
    }

    #[test]
    fn test_all_permits_saturates() {
        assert_eq!(all_permits(10), 10);
        assert_eq!(all_permits(usize::MAX), u32::MAX);
    }

    #[test]
    fn test_drop_reasons() {
        assert_eq!(drop_reason(&NotifierError::QueueFull), "queue_full");
        assert_eq!(drop_reason(&NotifierError::RateLimited(3)), "rate_limited");
        assert_eq!(drop_reason(&NotifierError::Closed), "closed");
    }
}
