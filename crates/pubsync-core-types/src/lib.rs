//! Core types shared across pubsync facilities
//!
//! This crate provides foundational types used by the error, logging and
//! storage layers:
//!
//! - **Correlation types**: RequestId, TraceId, RequestContext
//! - **Cancellation**: CancellationToken and per-request deadlines
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{CancellationToken, ContextState, RequestContext, RequestId, TraceId};
