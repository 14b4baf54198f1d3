//! `tracing` integration for the notice hook.

use tracing::{Event, Metadata, Subscriber};
use tracing_subscriber::filter::{Filtered, LevelFilter};
use tracing_subscriber::layer::{Context, Layer};

use crate::hook::adapter::NoticeHook;
use crate::hook::visitor::FieldVisitor;
use crate::notice::{LogEvent, Severity, StackFrame};

/// Target prefix of this crate's own events.
const INTERNAL_TARGET: &str = "incident_bridge";

/// Layer that turns warn-and-above `tracing` events into notices.
#[derive(Clone)]
pub struct NoticeLayer {
    hook: NoticeHook,
    report_caller: bool,
}

impl NoticeLayer {
    pub fn new(hook: NoticeHook, report_caller: bool) -> Self {
        Self { hook, report_caller }
    }

    /// Most verbose level the hook is interested in.
    pub fn level_filter() -> LevelFilter {
        LevelFilter::WARN
    }

    /// Wrap the layer in its per-layer level filter.
    ///
    /// Other layers in the same subscriber keep seeing every event.
    pub fn with_level_filter<S>(self) -> Filtered<Self, LevelFilter, S>
    where
        S: Subscriber,
    {
        <Self as Layer<S>>::with_filter(self, Self::level_filter())
    }

    fn log_event(&self, event: &Event<'_>) -> Option<LogEvent> {
        let meta = event.metadata();
        if is_internal(meta.target()) {
            return None;
        }

        let severity = Severity::from(*meta.level());
        if !self.hook.accepts(severity) {
            return None;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        Some(LogEvent {
            message: visitor.message.unwrap_or_else(|| meta.name().to_string()),
            severity,
            fields: visitor.fields,
            caller: if self.report_caller { caller(meta) } else { None },
        })
    }
}

fn is_internal(target: &str) -> bool {
    target
        .strip_prefix(INTERNAL_TARGET)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

fn caller(meta: &Metadata<'_>) -> Option<StackFrame> {
    let file = meta.file()?;
    Some(StackFrame::new(
        file,
        meta.line().unwrap_or(0),
        meta.module_path().unwrap_or_default(),
    ))
}

impl<S> Layer<S> for NoticeLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if let Some(log_event) = self.log_event(event) {
            self.hook.fire(&log_event);
        }
    }
}
