//! Failure reporting collaborator
//!
//! The retrying synchronizer records every failed published-store attempt
//! through a `FailureReporter`. Production wiring logs through `tracing`;
//! tests and operator tooling can use the recording implementation.

use crate::errors::{ExError, ExErrorKind};
use pubsync_core_types::schema::EVENT_PARTIAL_FAILURE;
use std::sync::{Arc, Mutex};

/// A structured key/value pair attached to a failure record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub key: &'static str,
    pub value: String,
}

impl Field {
    pub fn new(key: &'static str, value: impl ToString) -> Self {
        Self {
            key,
            value: value.to_string(),
        }
    }
}

pub trait FailureReporter: Send + Sync {
    fn record_failure(&self, message: &str, fields: &[Field], err: &ExError);
}

fn render_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| format!("{}={}", f.key, f.value))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Emits one `tracing` error event per failure
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingFailureReporter;

impl FailureReporter for TracingFailureReporter {
    fn record_failure(&self, message: &str, fields: &[Field], err: &ExError) {
        tracing::error!(
            component = module_path!(),
            event = EVENT_PARTIAL_FAILURE,
            err.kind = ?err.kind(),
            err.code = err.code(),
            fields = %render_fields(fields),
            error = %err,
            "{}",
            message
        );
    }
}

/// A captured failure
#[derive(Debug, Clone)]
pub struct FailureRecord {
    pub message: String,
    pub fields: Vec<Field>,
    pub kind: ExErrorKind,
    pub code: &'static str,
}

impl FailureRecord {
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
    }
}

/// Keeps every failure in memory; clones share the same buffer
#[derive(Debug, Clone, Default)]
pub struct RecordingFailureReporter {
    records: Arc<Mutex<Vec<FailureRecord>>>,
}

impl RecordingFailureReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<FailureRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.records.lock().map(|mut r| r.clear()).ok();
    }
}

impl FailureReporter for RecordingFailureReporter {
    fn record_failure(&self, message: &str, fields: &[Field], err: &ExError) {
        let record = FailureRecord {
            message: message.to_string(),
            fields: fields.to_vec(),
            kind: err.kind(),
            code: err.code(),
        };
        self.records.lock().map(|mut r| r.push(record)).ok();
    }
}
