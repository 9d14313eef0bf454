//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and failure reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Entity identifiers
pub const FIELD_ARTICLE_ID: &str = "art_id";
pub const FIELD_AUTHOR_ID: &str = "author_id";

// Retry bookkeeping
pub const FIELD_ATTEMPT: &str = "attempt";
pub const FIELD_MAX_ATTEMPTS: &str = "max_attempts";
pub const FIELD_STRATEGY: &str = "strategy";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_PARTIAL_FAILURE: &str = "partial_failure";
