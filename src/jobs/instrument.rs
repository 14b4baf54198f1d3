//! Start/end bracketing of background jobs.

use std::error::Error;
use std::future::Future;
use std::sync::Arc;

use crate::jobs::metric::{JobContext, QueueMetric};
use crate::notice::NoticeBuilder;
use crate::notifier::AsyncNotifier;
use crate::observability::metrics;

/// Reports queue metrics and job failures to the notifier.
///
/// Purely an observer: the job's own error handling is never affected.
#[derive(Clone)]
pub struct JobInstrumentation {
    notifier: Arc<dyn AsyncNotifier>,
    builder: NoticeBuilder,
}

impl JobInstrumentation {
    pub fn new(notifier: Arc<dyn AsyncNotifier>, builder: NoticeBuilder) -> Self {
        Self { notifier, builder }
    }

    /// Attach a fresh metric for job `name` to the context.
    pub fn start_job(&self, ctx: JobContext, name: &str) -> JobContext {
        let (ctx, previous) = ctx.attach(QueueMetric::new(name));
        if let Some(previous) = previous {
            tracing::debug!(
                job = name,
                replaced = previous.name(),
                "Job started on a context with an active metric; replacing it"
            );
        }
        ctx
    }

    /// Finalize the job metric and report `err`, if any.
    pub fn end_job<E>(&self, mut ctx: JobContext, name: &str, err: Option<&E>)
    where
        E: Error + ?Sized,
    {
        let Some(mut metric) = ctx.take_metric() else {
            tracing::error!(job = name, "end_job called on a context without start_job");
            return;
        };

        metric.errored = err.is_some();
        metric.finish();
        metrics::record_queue_metric(metric.errored);
        if let Err(e) = self.notifier.notify_queue_metric(metric) {
            tracing::debug!(job = name, error = %e, "Queue metric not submitted");
        }

        if let Some(err) = err {
            let notice = self
                .builder
                .build_job_error(name, std::any::type_name::<E>(), err.to_string());
            self.notifier.send_notice_async(notice);
        }
    }

    /// Run `job` between `start_job` and `end_job`, returning its result untouched.
    pub async fn run<F, T, E>(&self, name: &str, job: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: Error,
    {
        let ctx = self.start_job(JobContext::new(), name);
        let result = job.await;
        self.end_job(ctx, name, result.as_ref().err());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NotifierConfig;
    use crate::notifier::MemoryNotifier;

    #[derive(Debug, thiserror::Error)]
    #[error("card declined")]
    struct PaymentError;

    fn setup() -> (Arc<MemoryNotifier>, JobInstrumentation) {
        let memory = Arc::new(MemoryNotifier::new());
        let builder = NoticeBuilder::from_config(&NotifierConfig::new(1, "key", "prod"));
        let jobs = JobInstrumentation::new(memory.clone(), builder);
        (memory, jobs)
    }

    #[test]
    fn test_success_sends_metric_only() {
        let (memory, jobs) = setup();

        let ctx = jobs.start_job(JobContext::new(), "x");
        assert_eq!(ctx.metric().unwrap().name(), "x");
        jobs.end_job::<PaymentError>(ctx, "x", None);

        let metrics = memory.metrics();
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].name(), "x");
        assert!(!metrics[0].errored);
        assert!(metrics[0].is_finished());
        assert_eq!(memory.notice_count(), 0);
    }

    #[test]
    fn test_failure_sends_metric_and_notice() {
        let (memory, jobs) = setup();

        let ctx = jobs.start_job(JobContext::new(), "checkout");
        jobs.end_job(ctx, "checkout", Some(&PaymentError));

        let metrics = memory.metrics();
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].name(), "checkout");
        assert!(metrics[0].errored);

        let notices = memory.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "card declined");
        assert!(notices[0].error_type.ends_with("PaymentError"));
        assert!(notices[0].backtrace.is_empty());
        assert_eq!(notices[0].context("queue"), Some("checkout"));
        assert_eq!(notices[0].context("environment"), Some("prod"));
    }

    #[test]
    fn test_dyn_error() {
        let (memory, jobs) = setup();
        let err: Box<dyn Error + Send + Sync> = "boom".into();

        let ctx = jobs.start_job(JobContext::new(), "sync");
        jobs.end_job(ctx, "sync", Some(err.as_ref()));

        assert_eq!(memory.notices()[0].message, "boom");
    }

    #[test]
    fn test_missing_metric_is_ignored() {
        let (memory, jobs) = setup();
        jobs.end_job(JobContext::new(), "orphan", Some(&PaymentError));

        assert_eq!(memory.metric_count(), 0);
        assert_eq!(memory.notice_count(), 0);
    }

    #[tokio::test]
    async fn test_run_passes_result_through() {
        let (memory, jobs) = setup();

        let ok: Result<u32, PaymentError> = jobs.run("ok", async { Ok(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let failed: Result<u32, PaymentError> = jobs.run("bad", async { Err(PaymentError) }).await;
        assert!(failed.is_err());

        let metrics = memory.metrics();
        assert_eq!(metrics.len(), 2);
        assert!(!metrics[0].errored);
        assert!(metrics[1].errored);
        assert_eq!(memory.notice_count(), 1);
    }
}
