//! Framework-agnostic logging hook.

use std::sync::Arc;

use crate::notice::severity::REPORTABLE;
use crate::notice::{LogEvent, NoticeBuilder, Severity};
use crate::notifier::AsyncNotifier;

/// Filters log events, builds notices and hands them to the notifier.
#[derive(Clone)]
pub struct NoticeHook {
    notifier: Arc<dyn AsyncNotifier>,
    builder: NoticeBuilder,
}

impl NoticeHook {
    pub fn new(notifier: Arc<dyn AsyncNotifier>, builder: NoticeBuilder) -> Self {
        Self { notifier, builder }
    }

    /// Severities this hook wants to be called for.
    pub fn levels(&self) -> &'static [Severity] {
        &REPORTABLE
    }

    pub fn accepts(&self, severity: Severity) -> bool {
        severity.is_reportable()
    }

    /// Handle one log event.
    ///
    /// Returns whether a notice was submitted. Delivery happens later and its
    /// outcome is never reported here.
    pub fn fire(&self, event: &LogEvent) -> bool {
        if !self.accepts(event.severity) {
            return false;
        }
        self.notifier.send_notice_async(self.builder.build(event));
        true
    }
}
