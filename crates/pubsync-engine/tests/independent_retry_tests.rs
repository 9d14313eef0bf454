// Strategy B: independent stores, bounded published retry, partial failure
#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{item, memory_db, FailingDraftStore, RetryHarness};
use pubsync_core::errors::ExErrorKind;
use pubsync_core::failure::RecordingFailureReporter;
use pubsync_core::model::{ContentStatus, DraftRecord};
use pubsync_core::types::schema::{FIELD_ARTICLE_ID, FIELD_ATTEMPT, FIELD_MAX_ATTEMPTS};
use pubsync_core_types::RequestContext;
use pubsync_engine::{IndependentRetrySynchronizer, RetryPolicy, Synchronizer};
use pubsync_store::repo::PublishedDao;
use pubsync_store::SqlitePublishedStore;
use std::sync::Arc;

#[test]
fn test_publish_succeeds_on_third_attempt_with_two_failure_records() {
    // Given: A published store that rejects the first 2 writes
    let h = RetryHarness::new(2, ExErrorKind::Unavailable, 3);
    let ctx = RequestContext::new();

    // When: A new item is published
    let id = h.service.publish(&ctx, &item(1, "A")).unwrap();

    // Then: The published row exists with the draft id
    let published = h.service.get_published_by_id(&ctx, id).unwrap();
    assert_eq!(published.id, id);
    assert_eq!(published.status, ContentStatus::Published);

    // And: Exactly 2 failures were recorded, for attempts 1 and 2
    assert_eq!(h.published.attempts(), 3);
    let records = h.reporter.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].field(FIELD_ATTEMPT), Some("1"));
    assert_eq!(records[1].field(FIELD_ATTEMPT), Some("2"));
    assert_eq!(records[0].field(FIELD_ARTICLE_ID), Some(id.to_string().as_str()));
    assert_eq!(records[0].field(FIELD_MAX_ATTEMPTS), Some("3"));
}

#[test]
fn test_exhausted_retries_leave_observable_partial_state() {
    // Given: A published store that always fails
    let h = RetryHarness::new(u32::MAX, ExErrorKind::Unavailable, 3);
    let ctx = RequestContext::new();

    // When: A new item is published
    let err = h.service.publish(&ctx, &item(1, "A")).unwrap_err();

    // Then: The published store's error kind passes through, marked partial
    assert_eq!(err.kind(), ExErrorKind::Unavailable);
    assert!(err.is_partial());
    let id = err.committed_id().unwrap();
    assert!(id > 0);

    // And: The draft is committed as published; the published row is absent
    let draft = h.service.get_by_id(&ctx, id).unwrap();
    assert_eq!(draft.status, ContentStatus::Published);
    let missing = h.service.get_published_by_id(&ctx, id).unwrap_err();
    assert_eq!(missing.kind(), ExErrorKind::NotFound);

    // And: One failure record per attempt
    assert_eq!(h.reporter.len(), 3);
    assert_eq!(h.published.attempts(), 3);
}

#[test]
fn test_bound_of_one_records_single_failure() {
    let h = RetryHarness::new(u32::MAX, ExErrorKind::Unknown, 1);
    let ctx = RequestContext::new();

    let err = h.service.publish(&ctx, &item(1, "A")).unwrap_err();

    assert!(err.is_partial());
    assert_eq!(h.published.attempts(), 1);
    assert_eq!(h.reporter.len(), 1);
    assert_eq!(h.reporter.records()[0].kind, ExErrorKind::Unknown);
}

#[test]
fn test_draft_failure_aborts_without_partial_state() {
    // Given: A draft store that is down
    let published_db = memory_db();
    let reporter = RecordingFailureReporter::new();
    let sync = IndependentRetrySynchronizer::new(
        Arc::new(FailingDraftStore),
        Arc::new(SqlitePublishedStore::new(published_db.clone())),
        Arc::new(reporter.clone()),
        RetryPolicy::default(),
    );
    let ctx = RequestContext::new();

    // When: A record is synced
    let record = DraftRecord {
        title: "A".into(),
        author_id: 1,
        ..DraftRecord::default()
    };
    let err = sync.sync(&ctx, &record).unwrap_err();

    // Then: The draft error passes through unchanged, nothing reached published
    assert_eq!(err.kind(), ExErrorKind::Unavailable);
    assert!(!err.is_partial());
    assert!(reporter.is_empty());
    let rows = published_db
        .call(&ctx, "count", |conn| PublishedDao::count(conn))
        .unwrap();
    assert_eq!(rows, 0);
}

#[test]
fn test_non_retryable_published_error_is_not_retried() {
    let h = RetryHarness::new(u32::MAX, ExErrorKind::Forbidden, 3);
    let ctx = RequestContext::new();

    let err = h.service.publish(&ctx, &item(1, "A")).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Forbidden);
    assert!(err.is_partial());
    assert_eq!(h.published.attempts(), 1);
    assert_eq!(h.reporter.len(), 1);
}

#[test]
fn test_republish_updates_both_stores_under_same_id() {
    let h = RetryHarness::new(0, ExErrorKind::Unavailable, 3);
    let ctx = RequestContext::new();
    let id = h.service.publish(&ctx, &item(1, "A")).unwrap();

    let again = h
        .service
        .publish(&ctx, &item(1, "A, revised").with_id(id))
        .unwrap();

    assert_eq!(again, id);
    assert_eq!(h.service.get_published_by_id(&ctx, id).unwrap().title, "A, revised");
    let rows = h
        .published_db
        .call(&ctx, "count", |conn| PublishedDao::count(conn))
        .unwrap();
    assert_eq!(rows, 1);
    assert!(h.reporter.is_empty());
}

#[test]
fn test_strategy_reports_independent_retry() {
    let h = RetryHarness::new(0, ExErrorKind::Unavailable, 3);
    assert_eq!(
        h.service.strategy(),
        pubsync_core::SyncStrategyKind::IndependentRetry
    );
}
