//! Content item and its publication status

use crate::errors::{ExError, ExErrorKind, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Publication status of a content item
///
/// Stored as an ordinal; the ordinals are part of the persisted format and
/// must not be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    #[default]
    Unpublished,
    Published,
    Private,
}

impl ContentStatus {
    pub const ALL: [ContentStatus; 3] = [
        ContentStatus::Unpublished,
        ContentStatus::Published,
        ContentStatus::Private,
    ];

    pub fn to_ordinal(self) -> u8 {
        match self {
            ContentStatus::Unpublished => 0,
            ContentStatus::Published => 1,
            ContentStatus::Private => 2,
        }
    }

    /// Decode a stored ordinal; anything outside the enumeration is rejected
    pub fn from_ordinal(ordinal: u8) -> Result<Self> {
        match ordinal {
            0 => Ok(ContentStatus::Unpublished),
            1 => Ok(ContentStatus::Published),
            2 => Ok(ContentStatus::Private),
            other => Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("decode_status")
                .with_message(format!("unknown status ordinal {}", other))),
        }
    }

    /// Transition table
    ///
    /// - any → Unpublished (save as draft)
    /// - Unpublished → Published, Published → Published (re-publish an edit)
    /// - Published → Private, Private → Private (repeat withdraw)
    pub fn can_transition_to(self, next: ContentStatus) -> bool {
        use ContentStatus::*;
        matches!(
            (self, next),
            (_, Unpublished)
                | (Unpublished, Published)
                | (Published, Published)
                | (Published, Private)
                | (Private, Private)
        )
    }

    pub fn ensure_transition(self, next: ContentStatus, id: i64) -> Result<()> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(ExError::new(ExErrorKind::InvalidTransition)
                .with_op("status_transition")
                .with_entity_id(id)
                .with_message(format!("cannot move from {} to {}", self, next)))
        }
    }
}

impl std::fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ContentStatus::Unpublished => "unpublished",
            ContentStatus::Published => "published",
            ContentStatus::Private => "private",
        };
        f.write_str(s)
    }
}

/// A content item as the service facade sees it
///
/// `id == 0` means the item has not been written yet. The first successful
/// draft write assigns the id and it never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub author_id: i64,
    pub status: ContentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ContentItem {
    /// A not-yet-created item
    pub fn new(author_id: i64, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            body: body.into(),
            author_id,
            status: ContentStatus::Unpublished,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn is_new(&self) -> bool {
        self.id == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_are_stable() {
        assert_eq!(ContentStatus::Unpublished.to_ordinal(), 0);
        assert_eq!(ContentStatus::Published.to_ordinal(), 1);
        assert_eq!(ContentStatus::Private.to_ordinal(), 2);
    }

    #[test]
    fn test_unknown_ordinal_rejected() {
        let err = ContentStatus::from_ordinal(3).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    }

    #[test]
    fn test_private_cannot_be_published_directly() {
        assert!(!ContentStatus::Private.can_transition_to(ContentStatus::Published));
        let err = ContentStatus::Private
            .ensure_transition(ContentStatus::Published, 7)
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidTransition);
        assert_eq!(err.entity_id(), Some(7));
    }

    #[test]
    fn test_unpublished_cannot_be_withdrawn() {
        assert!(!ContentStatus::Unpublished.can_transition_to(ContentStatus::Private));
    }

    #[test]
    fn test_new_item_has_no_identity() {
        let item = ContentItem::new(1, "A", "body");
        assert!(item.is_new());
        assert_eq!(item.status, ContentStatus::Unpublished);
        assert!(!item.with_id(7).is_new());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&ContentStatus::Unpublished).unwrap();
        assert_eq!(json, "\"unpublished\"");
    }
}
