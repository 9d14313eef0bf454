// Integration tests for embedded migrations on disk
#![allow(clippy::unwrap_used, clippy::expect_used)]

use pubsync_store::migrations::{applied_migrations, apply_migrations};
use pubsync_store::SharedConnection;
use rusqlite::Connection;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_open_creates_both_tables() {
    // Given: A fresh database file
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("articles.db");

    // When: It is opened through the shared connection
    SharedConnection::open(&path, Duration::from_millis(100)).unwrap();

    // Then: Both tables exist
    let conn = Connection::open(&path).unwrap();
    for table in ["draft_articles", "published_articles"] {
        let n: i64 = conn
            .query_row(
                "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
                [table],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(n, 1, "missing table {}", table);
    }
}

#[test]
fn test_reopen_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("articles.db");
    SharedConnection::open(&path, Duration::from_millis(100)).unwrap();
    SharedConnection::open(&path, Duration::from_millis(100)).unwrap();

    let conn = Connection::open(&path).unwrap();
    let applied = applied_migrations(&conn).unwrap();
    assert_eq!(applied, vec!["001_draft_articles", "002_published_articles"]);
}

#[test]
fn test_tampered_checksum_is_rejected() {
    // Given: A migrated database whose ledger was edited
    let mut conn = Connection::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();
    conn.execute(
        "UPDATE schema_version SET checksum = 'bogus' WHERE migration_id = '001_draft_articles'",
        [],
    )
    .unwrap();

    // When/Then: Re-applying refuses to continue
    let err = apply_migrations(&mut conn).unwrap_err();
    assert!(err.message().contains("Checksum mismatch"));
}
