//! In-memory notifier for tests and dry runs.

use std::sync::{Mutex, MutexGuard};

use crate::jobs::QueueMetric;
use crate::notice::Notice;
use crate::notifier::{check_metric, AsyncNotifier, NotifierError};

/// Records submitted notices and metrics in submission order.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    notices: Mutex<Vec<Notice>>,
    metrics: Mutex<Vec<QueueMetric>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the submitted notices.
    pub fn notices(&self) -> Vec<Notice> {
        lock(&self.notices).clone()
    }

    /// Snapshot of the submitted metrics.
    pub fn metrics(&self) -> Vec<QueueMetric> {
        lock(&self.metrics).clone()
    }

    pub fn notice_count(&self) -> usize {
        lock(&self.notices).len()
    }

    pub fn metric_count(&self) -> usize {
        lock(&self.metrics).len()
    }

    /// Drop everything recorded so far.
    pub fn clear(&self) {
        lock(&self.notices).clear();
        lock(&self.metrics).clear();
    }
}

// A poisoned lock only means another recorder panicked; the data is still usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl AsyncNotifier for MemoryNotifier {
    fn send_notice_async(&self, notice: Notice) {
        lock(&self.notices).push(notice);
    }

    fn notify_queue_metric(&self, metric: QueueMetric) -> Result<(), NotifierError> {
        check_metric(&metric)?;
        lock(&self.metrics).push(metric);
        Ok(())
    }
}
