//! Bridge from `tracing` events and background jobs to an incident-tracking service.
//!
//! # Architecture Overview
//!
//! ```text
//!   tracing event ──▶ hook (NoticeLayer → NoticeHook) ──┐
//!                         │                             │
//!                         ▼                             ▼
//!                  notice (filter, builder,      notifier (AsyncNotifier)
//!                     backtrace)                 bounded queue → HTTP
//!                                                       ▲
//!   start_job / end_job ──▶ jobs (JobInstrumentation) ──┘
//!
//!   state (NotifierState): built once from config, cloned into hook and jobs
//! ```

pub mod config;
pub mod hook;
pub mod jobs;
pub mod notice;
pub mod notifier;
pub mod observability;
pub mod resilience;
pub mod state;

pub use config::BridgeConfig;
pub use hook::{NoticeHook, NoticeLayer};
pub use jobs::{JobContext, JobInstrumentation, QueueMetric};
pub use notice::{LogEvent, Notice, Severity};
pub use notifier::{AsyncNotifier, HttpNotifier, MemoryNotifier};
pub use state::{BridgeError, NotifierState};
