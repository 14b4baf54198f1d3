//! Response classification and the remote rate-limit window.
//!
//! # Design Decisions
//! - Transport errors and 5xx are retryable
//! - 429 opens a rate-limit window; nothing is sent until it closes
//! - Other 4xx are permanent: retrying the same payload cannot succeed

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::header::HeaderMap;
use reqwest::StatusCode;

/// Header carrying the rate-limit delay in seconds.
pub const RATE_LIMIT_DELAY_HEADER: &str = "x-ratelimit-delay";

/// Window used when the header is missing or malformed.
pub const DEFAULT_RATE_LIMIT_SECS: u64 = 60;

/// What to do with a payload after a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Delivered,
    Retry,
    RateLimited(Duration),
    Drop,
}

/// Classify a response status.
pub fn classify(status: StatusCode, headers: &HeaderMap) -> Disposition {
    if status.is_success() {
        Disposition::Delivered
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        Disposition::RateLimited(rate_limit_delay(headers))
    } else if status.is_server_error() {
        Disposition::Retry
    } else {
        Disposition::Drop
    }
}

fn rate_limit_delay(headers: &HeaderMap) -> Duration {
    let secs = headers
        .get(RATE_LIMIT_DELAY_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RATE_LIMIT_SECS);
    Duration::from_secs(secs)
}

/// Shared "do not send before" deadline.
#[derive(Debug, Default)]
pub struct RateLimitWindow {
    until_ms: AtomicU64,
}

impl RateLimitWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open (or extend) the window for `delay` from now.
    pub fn open_for(&self, delay: Duration) {
        let until = now_ms().saturating_add(delay.as_millis() as u64);
        self.until_ms.fetch_max(until, Ordering::Relaxed);
    }

    /// Seconds left in the window, if it is open.
    pub fn remaining_secs(&self) -> Option<u64> {
        let until = self.until_ms.load(Ordering::Relaxed);
        let now = now_ms();
        (until > now).then(|| (until - now).div_ceil(1000))
    }

    pub fn is_open(&self) -> bool {
        self.remaining_secs().is_some()
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_classify() {
        let headers = HeaderMap::new();
        assert_eq!(classify(StatusCode::CREATED, &headers), Disposition::Delivered);
        assert_eq!(classify(StatusCode::BAD_GATEWAY, &headers), Disposition::Retry);
        assert_eq!(classify(StatusCode::UNAUTHORIZED, &headers), Disposition::Drop);
        assert_eq!(classify(StatusCode::BAD_REQUEST, &headers), Disposition::Drop);
        assert_eq!(
            classify(StatusCode::TOO_MANY_REQUESTS, &headers),
            Disposition::RateLimited(Duration::from_secs(DEFAULT_RATE_LIMIT_SECS))
        );
    }

    #[test]
    fn test_rate_limit_header() {
        let mut headers = HeaderMap::new();
        headers.insert(RATE_LIMIT_DELAY_HEADER, HeaderValue::from_static("7"));
        assert_eq!(
            classify(StatusCode::TOO_MANY_REQUESTS, &headers),
            Disposition::RateLimited(Duration::from_secs(7))
        );
    }

    #[test]
    fn test_window() {
        let window = RateLimitWindow::new();
        assert!(!window.is_open());

        window.open_for(Duration::from_secs(30));
        let remaining = window.remaining_secs().unwrap();
        assert!((29..=30).contains(&remaining));

        // A shorter window does not shrink the current one
        window.open_for(Duration::from_secs(1));
        assert!(window.remaining_secs().unwrap() >= 29);
    }
}
