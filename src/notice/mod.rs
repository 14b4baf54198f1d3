//! Notice construction subsystem.
//!
//! # Data Flow
//! ```text
//! LogEvent
//!     → severity.rs (is the severity reportable?)
//!     → builder.rs (message, params, context tags)
//!         → backtrace.rs (caller frame → repository-relative frame)
//!     → Notice (owned by the notifier from here on)
//! ```
//!
//! # Design Decisions
//! - Every step is a pure function; nothing here performs I/O
//! - Building never fails: odd values degrade to strings or null
//! - `environment` and `severity` context tags are always set

pub mod backtrace;
pub mod builder;
pub mod severity;
pub mod types;

pub use backtrace::BacktraceNormalizer;
pub use builder::NoticeBuilder;
pub use severity::Severity;
pub use types::{FieldValue, LogEvent, Notice, StackFrame};
