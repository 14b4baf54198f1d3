//! JSON request bodies for the incident-tracking API.

use std::collections::BTreeMap;
use std::time::UNIX_EPOCH;

use serde::Serialize;
use serde_json::Value;

use crate::jobs::QueueMetric;
use crate::notice::{Notice, StackFrame};

const NOTIFIER_NAME: &str = env!("CARGO_PKG_NAME");
const NOTIFIER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize)]
pub struct NoticePayload<'a> {
    pub errors: [ErrorPayload<'a>; 1],
    pub context: ContextPayload<'a>,
    pub params: &'a BTreeMap<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct ErrorPayload<'a> {
    #[serde(rename = "type")]
    pub error_type: &'a str,
    pub message: &'a str,
    pub backtrace: &'a [StackFrame],
}

#[derive(Debug, Serialize)]
pub struct ContextPayload<'a> {
    #[serde(flatten)]
    pub tags: &'a BTreeMap<String, String>,
    pub notifier: NotifierInfo,
    pub language: &'static str,
}

#[derive(Debug, Serialize)]
pub struct NotifierInfo {
    pub name: &'static str,
    pub version: &'static str,
}

impl<'a> NoticePayload<'a> {
    pub fn new(notice: &'a Notice) -> Self {
        Self {
            errors: [ErrorPayload {
                error_type: &notice.error_type,
                message: &notice.message,
                backtrace: &notice.backtrace,
            }],
            context: ContextPayload {
                tags: &notice.context,
                notifier: NotifierInfo {
                    name: NOTIFIER_NAME,
                    version: NOTIFIER_VERSION,
                },
                language: "rust",
            },
            params: &notice.params,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QueueStatsPayload<'a> {
    pub environment: &'a str,
    pub queues: [QueueStat<'a>; 1],
}

#[derive(Debug, Serialize)]
pub struct QueueStat<'a> {
    pub queue: &'a str,
    pub errored: bool,
    /// Start time in unix seconds, truncated to the minute.
    pub time: u64,
    pub count: u32,
    /// Duration in milliseconds.
    pub sum: f64,
    pub sumsq: f64,
}

impl<'a> QueueStatsPayload<'a> {
    pub fn new(environment: &'a str, metric: &'a QueueMetric) -> Self {
        let started = metric
            .started_at()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let ms = metric.duration().as_secs_f64() * 1000.0;

        Self {
            environment,
            queues: [QueueStat {
                queue: metric.name(),
                errored: metric.errored,
                time: started - started % 60,
                count: 1,
                sum: ms,
                sumsq: ms * ms,
            }],
        }
    }
}
