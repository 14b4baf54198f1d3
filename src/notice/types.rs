//! Log event and notice types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::notice::severity::Severity;

/// A single call frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFrame {
    pub file: String,
    pub line: u32,
    pub function: String,
}

impl StackFrame {
    pub fn new(file: impl Into<String>, line: u32, function: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            function: function.into(),
        }
    }
}

/// A structured field value carried by a log event.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    I64(i64),
    U64(u64),
    F64(f64),
    Bool(bool),
    /// An error, already rendered to its message.
    Error(String),
    /// Any other value, rendered with `Debug`.
    Debug(String),
}

impl FieldValue {
    /// Convert to a notice parameter.
    ///
    /// Errors become their message string; everything else keeps its JSON
    /// type. Non-finite floats have no JSON form and become null.
    pub fn to_param(&self) -> Value {
        match self {
            FieldValue::Str(s) | FieldValue::Debug(s) | FieldValue::Error(s) => {
                Value::String(s.clone())
            }
            FieldValue::I64(n) => Value::from(*n),
            FieldValue::U64(n) => Value::from(*n),
            FieldValue::F64(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Bool(b) => Value::Bool(*b),
        }
    }

    /// Whether this value carries an error.
    pub fn is_error(&self) -> bool {
        matches!(self, FieldValue::Error(_))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Str(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Str(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::I64(value)
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::U64(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::F64(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// A log record as seen by the hook.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub message: String,
    pub severity: Severity,
    pub fields: BTreeMap<String, FieldValue>,
    pub caller: Option<StackFrame>,
}

impl LogEvent {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity,
            fields: BTreeMap::new(),
            caller: None,
        }
    }

    /// Add a field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Add an error-valued field.
    pub fn with_error(mut self, key: impl Into<String>, error: &dyn std::error::Error) -> Self {
        self.fields.insert(key.into(), FieldValue::Error(error.to_string()));
        self
    }

    /// Set the captured call site.
    pub fn with_caller(mut self, caller: StackFrame) -> Self {
        self.caller = Some(caller);
        self
    }
}

/// A structured error report for the incident-tracking service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub message: String,
    /// Type label of the reported error.
    pub error_type: String,
    pub backtrace: Vec<StackFrame>,
    pub params: BTreeMap<String, Value>,
    pub context: BTreeMap<String, String>,
}

impl Notice {
    pub fn new(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error_type: error_type.into(),
            backtrace: Vec::new(),
            params: BTreeMap::new(),
            context: BTreeMap::new(),
        }
    }

    /// Look up a context tag.
    pub fn context(&self, key: &str) -> Option<&str> {
        self.context.get(key).map(String::as_str)
    }
}
