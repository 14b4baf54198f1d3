//! Notifier client subsystem.
//!
//! # Data Flow
//! ```text
//! NoticeHook / JobInstrumentation
//!     → AsyncNotifier::send_notice_async (returns immediately)
//!     → AsyncNotifier::notify_queue_metric (returns immediately)
//!
//! HttpNotifier (http.rs):
//!     bounded mpsc queue
//!     → background worker (semaphore-limited requests)
//!     → payload.rs (JSON bodies)
//!     → remote API, retried with backoff (resilience)
//!
//! MemoryNotifier (memory.rs):
//!     records everything in order, no delivery
//! ```
//!
//! # Design Decisions
//! - Submission never blocks and never reports delivery outcome
//! - A full queue or an open rate-limit window drops, it does not wait
//! - Delivery failures stay inside the notifier; they are logged and counted

pub mod http;
pub mod memory;
pub mod payload;

use thiserror::Error;

use crate::jobs::QueueMetric;
use crate::notice::Notice;

pub use http::HttpNotifier;
pub use memory::MemoryNotifier;

/// Local submission failures.
#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("delivery queue is full")]
    QueueFull,

    #[error("delivery worker has stopped")]
    Closed,

    #[error("remote service is rate limiting, retry in {0} seconds")]
    RateLimited(u64),

    #[error("invalid queue metric: {0}")]
    InvalidMetric(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to start delivery runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Client that delivers notices and queue metrics off the calling thread.
///
/// Both methods must return without waiting on the network.
pub trait AsyncNotifier: Send + Sync {
    /// Submit a notice. Delivery failures are never reported back.
    fn send_notice_async(&self, notice: Notice);

    /// Submit a finalized queue metric.
    ///
    /// Errors describe local rejection only (bad metric, full queue).
    fn notify_queue_metric(&self, metric: QueueMetric) -> Result<(), NotifierError>;
}

/// Reject metrics the remote service cannot attribute.
pub(crate) fn check_metric(metric: &QueueMetric) -> Result<(), NotifierError> {
    if metric.name().trim().is_empty() {
        return Err(NotifierError::InvalidMetric("queue name is empty".to_string()));
    }
    Ok(())
}
