//! Correlation and cancellation types carried through every operation
//!
//! A `RequestContext` travels from the service facade down to each store
//! call. It identifies the request for logging and carries the caller's
//! cancellation signal and deadline.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Unique identifier for a single request or operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new random RequestId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trace identifier for distributed tracing across service boundaries
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraceId(String);

impl TraceId {
    /// Generate a new random TraceId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Adopt a trace id handed in by an upstream caller
    pub fn from_string(s: String) -> Self {
        Self(s)
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shared cancellation flag
///
/// Clones observe the same flag, so the caller keeps one clone and hands
/// another to the request.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation to every holder of this token
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Liveness of a request context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Live,
    Cancelled,
    DeadlineExceeded,
}

/// Context carried through operation boundaries for correlation and cancellation
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: RequestId,
    pub trace_id: Option<TraceId>,
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// Create a new context with a fresh RequestId, no deadline and its own token
    pub fn new() -> Self {
        Self {
            request_id: RequestId::new(),
            trace_id: None,
            cancel: CancellationToken::new(),
            deadline: None,
        }
    }

    /// Create a context with an existing RequestId
    pub fn with_request_id(request_id: RequestId) -> Self {
        Self {
            request_id,
            ..Self::new()
        }
    }

    /// Add a TraceId to the context
    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Bind the context to a caller-owned cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Set an absolute deadline
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set a deadline relative to now
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Current liveness: cancellation wins over an elapsed deadline
    pub fn state(&self) -> ContextState {
        if self.cancel.is_cancelled() {
            ContextState::Cancelled
        } else if self.deadline.is_some_and(|d| Instant::now() >= d) {
            ContextState::DeadlineExceeded
        } else {
            ContextState::Live
        }
    }

    pub fn is_done(&self) -> bool {
        self.state() != ContextState::Live
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
