//! Logging hook subsystem.
//!
//! # Data Flow
//! ```text
//! tracing event
//!     → layer.rs (per-layer WARN filter, skip this crate's own events)
//!     → visitor.rs (fields → FieldValue, `message` → message)
//!     → adapter.rs NoticeHook::fire
//!         → Severity filter
//!         → NoticeBuilder
//!         → AsyncNotifier::send_notice_async
//!
//! panic
//!     → panic.rs (payload + location → panic severity LogEvent)
//!     → adapter.rs NoticeHook::fire
//! ```
//!
//! # Design Decisions
//! - Levels are declared twice: the layer's level filter and the hook's own check
//! - The hook returns as soon as the notice is queued
//! - Delivery diagnostics log under this crate's target and never loop back

pub mod adapter;
pub mod layer;
pub mod panic;
pub mod visitor;

pub use adapter::NoticeHook;
pub use layer::NoticeLayer;
pub use panic::install_panic_hook;
