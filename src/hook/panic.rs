//! Panic reporting.

use std::any::Any;
use std::panic::{self, Location};

use crate::hook::adapter::NoticeHook;
use crate::notice::{LogEvent, Severity, StackFrame};

/// Report panics as `panic` severity notices, then run the previous hook.
///
/// Delivery is asynchronous, so a panic that aborts the process may exit
/// before its notice leaves the queue.
pub fn install_panic_hook(hook: NoticeHook) {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let thread = std::thread::current();
        let event = panic_event(payload_message(info.payload()), info.location(), thread.name());
        hook.fire(&event);
        previous(info);
    }));
}

fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}

fn panic_event(message: String, location: Option<&Location<'_>>, thread: Option<&str>) -> LogEvent {
    let mut event = LogEvent::new(Severity::Panic, message)
        .with_field("thread", thread.unwrap_or("<unnamed>"));
    if let Some(location) = location {
        event = event.with_caller(StackFrame::new(location.file(), location.line(), ""));
    }
    event
}
