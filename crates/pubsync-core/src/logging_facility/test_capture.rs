//! In-process capture of log events
//!
//! A layer that stores every event it sees so tests can assert on the
//! operation boundaries the facade emits and on partial-failure events.

use pubsync_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_COMPONENT, FIELD_DURATION_MS, FIELD_ERR_CODE,
    FIELD_ERR_KIND, FIELD_EVENT, FIELD_OP, FIELD_REQUEST_ID, FIELD_TRACE_ID,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::field::{Field, Visit};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// A captured log event with all its fields rendered as strings
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub op: Option<String>,
    pub event: Option<String>,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn component(&self) -> Option<&str> {
        self.field(FIELD_COMPONENT)
    }

    pub fn request_id(&self) -> Option<&str> {
        self.field(FIELD_REQUEST_ID)
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.field(FIELD_TRACE_ID)
    }

    pub fn duration_ms(&self) -> Option<u64> {
        self.field(FIELD_DURATION_MS).and_then(|v| v.parse().ok())
    }

    /// Stable error code of an `end_error` event
    pub fn err_code(&self) -> Option<&str> {
        self.field(FIELD_ERR_CODE)
    }

    pub fn err_kind(&self) -> Option<&str> {
        self.field(FIELD_ERR_KIND)
    }

    fn is(&self, op: &str, event: &str) -> bool {
        self.op.as_deref() == Some(op) && self.event.as_deref() == Some(event)
    }
}

#[derive(Default)]
struct FieldVisitor {
    fields: HashMap<String, String>,
}

impl FieldVisitor {
    fn put(&mut self, field: &Field, value: String) {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.put(field, format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, value.to_string());
    }
}

/// Layer that appends each event to a shared buffer
pub struct TestCaptureLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl TestCaptureLayer {
    pub fn new() -> (Self, TestCapture) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let layer = Self {
            events: Arc::clone(&events),
        };
        (layer, TestCapture { events })
    }
}

impl<S> Layer<S> for TestCaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let captured = CapturedEvent {
            level: *event.metadata().level(),
            op: visitor.fields.get(FIELD_OP).cloned(),
            event: visitor.fields.get(FIELD_EVENT).cloned(),
            fields: visitor.fields,
        };

        self.events.lock().map(|mut e| e.push(captured)).ok();
    }
}

/// Handle for reading captured events; clones share the buffer
#[derive(Clone)]
pub struct TestCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl TestCapture {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Events carrying the given request id
    pub fn events_for_request(&self, request_id: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.request_id() == Some(request_id))
            .collect()
    }

    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.events().iter().filter(|e| predicate(e)).count()
    }

    /// # Panics
    ///
    /// Panics if no event matches `op` and `event`
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let events = self.events();
        assert!(
            events.iter().any(|e| e.is(op, event)),
            "Expected event op={} event={} not found in {} captured events",
            op,
            event,
            events.len()
        );
    }

    /// Exactly one start and exactly one terminal event for `op` within a request
    ///
    /// # Panics
    ///
    /// Panics when the boundary is missing or duplicated
    pub fn assert_single_boundary(&self, request_id: &str, op: &str) {
        let events = self.events_for_request(request_id);
        let starts = events.iter().filter(|e| e.is(op, EVENT_START)).count();
        let ends = events
            .iter()
            .filter(|e| e.is(op, EVENT_END) || e.is(op, EVENT_END_ERROR))
            .count();
        assert_eq!(starts, 1, "op={} request={} starts={}", op, request_id, starts);
        assert_eq!(ends, 1, "op={} request={} ends={}", op, request_id, ends);
    }

    pub fn clear(&self) {
        self.events.lock().map(|mut e| e.clear()).ok();
    }
}

static GLOBAL_CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture layer as the global subscriber (once per process)
///
/// ```
/// use pubsync_core::logging_facility::test_capture::init_test_capture;
/// use pubsync_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("doc_capture_op");
/// capture.assert_event_exists("doc_capture_op", "start");
/// ```
pub fn init_test_capture() -> TestCapture {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let (layer, capture) = TestCaptureLayer::new();
            tracing_subscriber::registry().with(layer).init();
            capture
        })
        .clone()
}
