//! Background job instrumentation.
//!
//! # Data Flow
//! ```text
//! start_job(ctx, name)
//!     → QueueMetric attached to JobContext
//!     → ... job runs, ctx travels with it ...
//! end_job(ctx, name, err)
//!     → metric.errored = err.is_some()
//!     → AsyncNotifier::notify_queue_metric (metric moved, finalized once)
//!     → on error: NoticeBuilder::build_job_error → send_notice_async
//! ```
//!
//! # Design Decisions
//! - `end_job` consumes the context, so a metric cannot be finalized twice
//! - One active metric per context; starting again replaces it

pub mod instrument;
pub mod metric;

pub use instrument::JobInstrumentation;
pub use metric::{JobContext, QueueMetric};
