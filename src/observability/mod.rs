//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Application and bridge code produce:
//!     → logging.rs (subscriber: local fmt output + NoticeLayer)
//!     → metrics.rs (delivery counters)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → incident-tracking service (via NoticeLayer)
//!     → whatever `metrics` recorder the host installs
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Metrics are cheap (atomic increments)
//! - The bridge's own diagnostics never become notices

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
