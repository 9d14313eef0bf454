//! Domain model and store-level records

pub mod content;
pub mod record;

pub use content::{ContentItem, ContentStatus};
pub use record::{DraftRecord, PublishedRecord};
