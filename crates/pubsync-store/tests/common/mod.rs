// Shared fixtures for store integration tests
#![allow(dead_code)]

use pubsync_core::model::{ContentStatus, DraftRecord};
use pubsync_store::SharedConnection;

pub fn memory_db() -> SharedConnection {
    SharedConnection::open_in_memory().unwrap()
}

pub fn draft(author_id: i64, title: &str) -> DraftRecord {
    DraftRecord {
        title: title.to_string(),
        body: format!("{} body", title),
        author_id,
        status: ContentStatus::Unpublished.to_ordinal(),
        ..DraftRecord::default()
    }
}

pub fn published_draft(id: i64, author_id: i64, title: &str) -> DraftRecord {
    DraftRecord {
        id,
        status: ContentStatus::Published.to_ordinal(),
        ..draft(author_id, title)
    }
}
