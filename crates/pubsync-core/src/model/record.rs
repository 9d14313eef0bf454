//! Store-level projections of a content item
//!
//! `DraftRecord` and `PublishedRecord` carry the same columns but are
//! distinct types: the two stores are independent and a value meant for
//! one must never be handed to the other by accident. The only bridge is
//! `PublishedRecord::from_draft`, used once the draft id is known.

use super::content::{ContentItem, ContentStatus};
use crate::errors::{ExError, ExErrorKind, Result};
use chrono::{DateTime, TimeZone, Utc};

/// Row in the draft store
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DraftRecord {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub author_id: i64,
    pub status: u8,
    /// Unix millis, filled in by the store
    pub created_at: i64,
    pub updated_at: i64,
}

/// Row in the published store, keyed by the draft id
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PublishedRecord {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub author_id: i64,
    pub status: u8,
    pub created_at: i64,
    pub updated_at: i64,
}

impl DraftRecord {
    pub fn from_item(item: &ContentItem) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            body: item.body.clone(),
            author_id: item.author_id,
            status: item.status.to_ordinal(),
            created_at: item.created_at.map(|t| t.timestamp_millis()).unwrap_or(0),
            updated_at: item.updated_at.map(|t| t.timestamp_millis()).unwrap_or(0),
        }
    }

    pub fn into_item(self) -> Result<ContentItem> {
        Ok(ContentItem {
            id: self.id,
            title: self.title,
            body: self.body,
            author_id: self.author_id,
            status: ContentStatus::from_ordinal(self.status)?,
            created_at: millis_to_datetime(self.created_at),
            updated_at: millis_to_datetime(self.updated_at),
        })
    }
}

impl PublishedRecord {
    /// Project a draft into the published store; requires an assigned id
    pub fn from_draft(draft: &DraftRecord) -> Result<Self> {
        if draft.id <= 0 {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("project_published")
                .with_message("draft has no identity yet"));
        }
        Ok(Self {
            id: draft.id,
            title: draft.title.clone(),
            body: draft.body.clone(),
            author_id: draft.author_id,
            status: draft.status,
            created_at: draft.created_at,
            updated_at: draft.updated_at,
        })
    }

    pub fn into_item(self) -> Result<ContentItem> {
        Ok(ContentItem {
            id: self.id,
            title: self.title,
            body: self.body,
            author_id: self.author_id,
            status: ContentStatus::from_ordinal(self.status)?,
            created_at: millis_to_datetime(self.created_at),
            updated_at: millis_to_datetime(self.updated_at),
        })
    }
}

fn millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    if millis <= 0 {
        return None;
    }
    Utc.timestamp_millis_opt(millis).single()
}
