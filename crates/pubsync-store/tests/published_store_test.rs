// Integration tests for the published store: idempotent upsert and guarded status
#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::memory_db;
use pubsync_core::errors::ExErrorKind;
use pubsync_core::model::{ContentStatus, PublishedRecord};
use pubsync_core::repository::{PublishedStore, StatusSync};
use pubsync_core_types::RequestContext;
use pubsync_store::repo::PublishedDao;
use pubsync_store::{PublishedStatusMirror, SqlitePublishedStore};

fn record(id: i64, author_id: i64, title: &str) -> PublishedRecord {
    PublishedRecord {
        id,
        title: title.to_string(),
        body: "body".to_string(),
        author_id,
        status: ContentStatus::Published.to_ordinal(),
        ..PublishedRecord::default()
    }
}

#[test]
fn test_upsert_twice_leaves_one_identical_row() {
    // Given: A published store
    let db = memory_db();
    let store = SqlitePublishedStore::new(db.clone());
    let ctx = RequestContext::new();

    // When: The same record is upserted twice
    store.upsert(&ctx, &record(7, 1, "A")).unwrap();
    let once = store.get_by_id(&ctx, 7).unwrap();
    store.upsert(&ctx, &record(7, 1, "A")).unwrap();
    let twice = store.get_by_id(&ctx, 7).unwrap();

    // Then: One row, same content, same creation time
    let rows = db.call(&ctx, "count", |conn| PublishedDao::count(conn)).unwrap();
    assert_eq!(rows, 1);
    assert_eq!(once.title, twice.title);
    assert_eq!(once.body, twice.body);
    assert_eq!(once.status, twice.status);
    assert_eq!(once.created_at, twice.created_at);
}

#[test]
fn test_upsert_replaces_existing_row() {
    let store = SqlitePublishedStore::new(memory_db());
    let ctx = RequestContext::new();

    store.upsert(&ctx, &record(7, 1, "A")).unwrap();
    store.upsert(&ctx, &record(7, 1, "A, revised")).unwrap();

    let stored = store.get_by_id(&ctx, 7).unwrap();
    assert_eq!(stored.id, 7);
    assert_eq!(stored.title, "A, revised");
}

#[test]
fn test_upsert_rejects_non_positive_id() {
    let store = SqlitePublishedStore::new(memory_db());
    let err = store
        .upsert(&RequestContext::new(), &record(0, 1, "A"))
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Conflict);
}

#[test]
fn test_get_missing_is_not_found() {
    let store = SqlitePublishedStore::new(memory_db());
    let err = store.get_by_id(&RequestContext::new(), 7).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_sync_status_by_other_author_is_forbidden() {
    // Given: A published row owned by author 2
    let store = SqlitePublishedStore::new(memory_db());
    let ctx = RequestContext::new();
    store.upsert(&ctx, &record(7, 2, "A")).unwrap();

    // When: Author 1 withdraws it
    let err = store
        .sync_status(&ctx, 7, 1, ContentStatus::Private)
        .unwrap_err();

    // Then: Forbidden and the stored status is unchanged
    assert_eq!(err.kind(), ExErrorKind::Forbidden);
    assert_eq!(err.author_id(), Some(1));
    let stored = store.get_by_id(&ctx, 7).unwrap();
    assert_eq!(stored.status, ContentStatus::Published.to_ordinal());
}

#[test]
fn test_sync_status_missing_is_not_found() {
    let store = SqlitePublishedStore::new(memory_db());
    let err = store
        .sync_status(&RequestContext::new(), 7, 1, ContentStatus::Private)
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_sync_status_changes_only_status() {
    let store = SqlitePublishedStore::new(memory_db());
    let ctx = RequestContext::new();
    store.upsert(&ctx, &record(7, 1, "A")).unwrap();

    store.sync_status(&ctx, 7, 1, ContentStatus::Private).unwrap();

    let stored = store.get_by_id(&ctx, 7).unwrap();
    assert_eq!(stored.status, ContentStatus::Private.to_ordinal());
    assert_eq!(stored.title, "A");
}

#[test]
fn test_status_mirror_skips_missing_row() {
    // Given: A published store with no row for the item
    let db = memory_db();
    let mirror = PublishedStatusMirror::new(db.clone());

    // When: A status change is mirrored
    mirror
        .sync_status(&RequestContext::new(), 7, 1, ContentStatus::Private)
        .unwrap();

    // Then: Nothing was created
    let rows = db
        .call(&RequestContext::new(), "count", |conn| PublishedDao::count(conn))
        .unwrap();
    assert_eq!(rows, 0);
}

#[test]
fn test_status_mirror_still_guards_author() {
    let db = memory_db();
    let store = SqlitePublishedStore::new(db.clone());
    let mirror = PublishedStatusMirror::new(db);
    let ctx = RequestContext::new();
    store.upsert(&ctx, &record(7, 2, "A")).unwrap();

    let err = mirror
        .sync_status(&ctx, 7, 1, ContentStatus::Private)
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Forbidden);
    let stored = store.get_by_id(&ctx, 7).unwrap();
    assert_eq!(stored.status, ContentStatus::Published.to_ordinal());
}

#[test]
fn test_status_mirror_updates_existing_row() {
    let db = memory_db();
    let store = SqlitePublishedStore::new(db.clone());
    let mirror = PublishedStatusMirror::new(db);
    let ctx = RequestContext::new();
    store.upsert(&ctx, &record(7, 1, "A")).unwrap();

    mirror.sync_status(&ctx, 7, 1, ContentStatus::Private).unwrap();

    let stored = store.get_by_id(&ctx, 7).unwrap();
    assert_eq!(stored.status, ContentStatus::Private.to_ordinal());
}
