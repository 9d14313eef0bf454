//! pubsync core - domain model, storage contracts and facilities
//!
//! This crate provides:
//! - The content item model, its status transitions and store records
//! - Storage contracts for the draft and published stores
//! - The failure reporter used by the retrying synchronizer
//! - Deployment configuration
//! - The structured error and logging facilities

pub mod config;
pub mod errors;
pub mod failure;
pub mod logging_facility;
pub mod model;
pub mod repository;

pub use pubsync_core_types as types;

// Re-export commonly used types
pub use config::{SyncConfig, SyncStrategyKind};
pub use errors::{ExError, ExErrorKind, Result};
pub use failure::{FailureReporter, Field, RecordingFailureReporter, TracingFailureReporter};
pub use model::{ContentItem, ContentStatus, DraftRecord, PublishedRecord};
pub use repository::{ArticleRepository, DraftStore, PublishedStore, StatusSync};
