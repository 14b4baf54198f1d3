//! Collects `tracing` event fields into log event fields.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

use tracing::field::{Field, Visit};

use crate::notice::FieldValue;

const MESSAGE_FIELD: &str = "message";

/// Fields added by the `log` compatibility layer; not application data.
const LOG_COMPAT_PREFIX: &str = "log.";

#[derive(Debug, Default)]
pub struct FieldVisitor {
    pub message: Option<String>,
    pub fields: BTreeMap<String, FieldValue>,
}

impl FieldVisitor {
    fn insert(&mut self, field: &Field, value: FieldValue) {
        let name = field.name();
        if name.starts_with(LOG_COMPAT_PREFIX) {
            return;
        }
        self.fields.insert(name.to_string(), value);
    }
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == MESSAGE_FIELD {
            self.message = Some(value.to_string());
        } else {
            self.insert(field, FieldValue::Str(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, FieldValue::I64(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, FieldValue::U64(value));
    }

    fn record_i128(&mut self, field: &Field, value: i128) {
        let value = match i64::try_from(value) {
            Ok(n) => FieldValue::I64(n),
            Err(_) => FieldValue::Debug(value.to_string()),
        };
        self.insert(field, value);
    }

    fn record_u128(&mut self, field: &Field, value: u128) {
        let value = match u64::try_from(value) {
            Ok(n) => FieldValue::U64(n),
            Err(_) => FieldValue::Debug(value.to_string()),
        };
        self.insert(field, value);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, FieldValue::F64(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, FieldValue::Bool(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn Error + 'static)) {
        self.insert(field, FieldValue::Error(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == MESSAGE_FIELD {
            self.message = Some(format!("{:?}", value));
        } else {
            self.insert(field, FieldValue::Debug(format!("{:?}", value)));
        }
    }
}
