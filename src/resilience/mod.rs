//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Payload delivery attempt:
//!     → retries.rs (classify response: delivered / retry / rate limited / drop)
//!     → On retry: backoff.rs (exponential delay with jitter)
//!     → On 429: retries.rs RateLimitWindow (drop new payloads until it closes)
//! ```
//!
//! # Design Decisions
//! - Retries are bounded by `delivery.max_attempts`
//! - Jittered backoff prevents thundering herd
//! - The rate-limit window is shared by every in-flight request

pub mod backoff;
pub mod retries;
