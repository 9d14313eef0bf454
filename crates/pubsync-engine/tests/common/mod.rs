// Shared fixtures and store doubles for engine integration tests
#![allow(dead_code)]

use pubsync_core::errors::{ExError, ExErrorKind, Result};
use pubsync_core::failure::RecordingFailureReporter;
use pubsync_core::model::{ContentItem, DraftRecord, PublishedRecord};
use pubsync_core::repository::{DraftStore, PublishedStore};
use pubsync_core_types::RequestContext;
use pubsync_engine::deployment::independent_status;
use pubsync_engine::{ArticleService, IndependentRetrySynchronizer, RetryPolicy};
use pubsync_store::{SharedConnection, SqliteDraftStore, SqlitePublishedStore};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

pub fn memory_db() -> SharedConnection {
    SharedConnection::open_in_memory().unwrap()
}

pub fn item(author_id: i64, title: &str) -> ContentItem {
    ContentItem::new(author_id, title, format!("{} body", title))
}

/// Published store that rejects the first `failures` upserts
pub struct FlakyPublishedStore {
    inner: SqlitePublishedStore,
    failures_left: AtomicU32,
    attempts: AtomicU32,
    kind: ExErrorKind,
}

impl FlakyPublishedStore {
    pub fn new(db: SharedConnection, failures: u32, kind: ExErrorKind) -> Self {
        Self {
            inner: SqlitePublishedStore::new(db),
            failures_left: AtomicU32::new(failures),
            attempts: AtomicU32::new(0),
            kind,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl PublishedStore for FlakyPublishedStore {
    fn upsert(&self, ctx: &RequestContext, record: &PublishedRecord) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let reject = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if reject {
            return Err(ExError::new(self.kind)
                .with_op("published.upsert")
                .with_entity_id(record.id)
                .with_message("injected published failure"));
        }
        self.inner.upsert(ctx, record)
    }

    fn get_by_id(&self, ctx: &RequestContext, id: i64) -> Result<PublishedRecord> {
        self.inner.get_by_id(ctx, id)
    }
}

/// Draft store whose writes always fail
pub struct FailingDraftStore;

impl DraftStore for FailingDraftStore {
    fn insert(&self, _ctx: &RequestContext, _record: &DraftRecord) -> Result<i64> {
        Err(ExError::new(ExErrorKind::Unavailable).with_message("draft store down"))
    }

    fn update_by_id(&self, _ctx: &RequestContext, _record: &DraftRecord) -> Result<()> {
        Err(ExError::new(ExErrorKind::Unavailable).with_message("draft store down"))
    }

    fn get_by_id(&self, _ctx: &RequestContext, id: i64) -> Result<DraftRecord> {
        Err(ExError::new(ExErrorKind::NotFound).with_entity_id(id))
    }

    fn list_by_author(
        &self,
        _ctx: &RequestContext,
        _author_id: i64,
        _offset: u32,
        _limit: u32,
    ) -> Result<Vec<DraftRecord>> {
        Ok(Vec::new())
    }
}

/// Strategy B over two private databases with an injectable published store
pub struct RetryHarness {
    pub draft_db: SharedConnection,
    pub published_db: SharedConnection,
    pub published: Arc<FlakyPublishedStore>,
    pub reporter: RecordingFailureReporter,
    pub service: ArticleService,
}

impl RetryHarness {
    pub fn new(failures: u32, kind: ExErrorKind, max_attempts: u32) -> Self {
        let draft_db = memory_db();
        let published_db = memory_db();
        let draft = Arc::new(SqliteDraftStore::new(draft_db.clone()));
        let published = Arc::new(FlakyPublishedStore::new(published_db.clone(), failures, kind));
        let reporter = RecordingFailureReporter::new();

        let synchronizer = IndependentRetrySynchronizer::new(
            draft.clone(),
            published.clone(),
            Arc::new(reporter.clone()),
            RetryPolicy::new(max_attempts),
        );
        let status = independent_status(draft_db.clone(), published_db.clone());
        let service = ArticleService::new(
            draft,
            published.clone(),
            Box::new(synchronizer),
            status,
        );

        Self {
            draft_db,
            published_db,
            published,
            reporter,
            service,
        }
    }
}
