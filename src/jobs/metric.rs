//! Queue metrics and the job propagation context.

use std::time::{Duration, Instant, SystemTime};

/// Outcome measurement of one background job run.
///
/// Created by `start_job`, finalized by moving it into the notifier.
#[derive(Debug, Clone)]
pub struct QueueMetric {
    name: String,
    /// Set when the job finished with an error.
    pub errored: bool,
    started_at: SystemTime,
    started: Instant,
    duration: Option<Duration>,
}

impl QueueMetric {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            errored: false,
            started_at: SystemTime::now(),
            started: Instant::now(),
            duration: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wall-clock start time.
    pub fn started_at(&self) -> SystemTime {
        self.started_at
    }

    /// Run duration, fixed by `finish`; elapsed time until then.
    pub fn duration(&self) -> Duration {
        self.duration.unwrap_or_else(|| self.started.elapsed())
    }

    pub fn is_finished(&self) -> bool {
        self.duration.is_some()
    }

    /// Stop the clock. Later calls keep the first duration.
    pub fn finish(&mut self) {
        if self.duration.is_none() {
            self.duration = Some(self.started.elapsed());
        }
    }
}

/// Carrier threaded through a job's lifetime.
///
/// Holds at most one active metric.
#[derive(Debug, Default)]
pub struct JobContext {
    metric: Option<QueueMetric>,
}

impl JobContext {
    /// An empty context with no active job.
    pub fn new() -> Self {
        Self::default()
    }

    /// The active metric, if a job was started on this context.
    pub fn metric(&self) -> Option<&QueueMetric> {
        self.metric.as_ref()
    }

    pub(crate) fn attach(mut self, metric: QueueMetric) -> (Self, Option<QueueMetric>) {
        let previous = self.metric.replace(metric);
        (self, previous)
    }

    pub(crate) fn take_metric(&mut self) -> Option<QueueMetric> {
        self.metric.take()
    }
}
