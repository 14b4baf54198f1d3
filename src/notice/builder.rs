//! Notice assembly.

use crate::config::NotifierConfig;
use crate::notice::backtrace::BacktraceNormalizer;
use crate::notice::severity::Severity;
use crate::notice::types::{LogEvent, Notice};

/// Error type label used for notices built from log events.
pub const LOG_ERROR_TYPE: &str = "log";

pub const CONTEXT_ENVIRONMENT: &str = "environment";
pub const CONTEXT_SEVERITY: &str = "severity";
pub const CONTEXT_QUEUE: &str = "queue";

/// Builds notices from log events and job failures.
///
/// Pure transformation: no I/O and no failure path.
#[derive(Debug, Clone)]
pub struct NoticeBuilder {
    environment: String,
    normalizer: BacktraceNormalizer,
}

impl NoticeBuilder {
    pub fn new(environment: impl Into<String>, normalizer: BacktraceNormalizer) -> Self {
        Self {
            environment: environment.into(),
            normalizer,
        }
    }

    pub fn from_config(config: &NotifierConfig) -> Self {
        Self::new(
            config.environment.clone(),
            BacktraceNormalizer::new(config.source_path_prefix.clone(), config.build_root.clone()),
        )
    }

    /// Build a notice from an accepted log event.
    pub fn build(&self, event: &LogEvent) -> Notice {
        let mut notice = Notice::new(LOG_ERROR_TYPE, event.message.clone());

        if let Some(caller) = &event.caller {
            notice.backtrace = vec![self.normalizer.normalize(caller)];
        }

        notice.params = event
            .fields
            .iter()
            .map(|(key, value)| (key.clone(), value.to_param()))
            .collect();

        self.tag(&mut notice, event.severity);
        notice
    }

    /// Build a notice for a failed background job.
    pub fn build_job_error(&self, queue: &str, error_type: &str, message: String) -> Notice {
        let mut notice = Notice::new(error_type, message);
        notice.context.insert(CONTEXT_QUEUE.to_string(), queue.to_string());
        self.tag(&mut notice, Severity::Error);
        notice
    }

    fn tag(&self, notice: &mut Notice, severity: Severity) {
        notice
            .context
            .insert(CONTEXT_ENVIRONMENT.to_string(), self.environment.clone());
        notice
            .context
            .insert(CONTEXT_SEVERITY.to_string(), severity.as_str().to_string());
    }
}
