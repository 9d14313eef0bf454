//! Published store
//!
//! Rows are keyed by the draft identity and written only by upsert, so
//! replaying the same projection leaves one row with the same content.

use crate::db::SharedConnection;
use crate::errors::{from_rusqlite, not_found, Result};
use crate::repo::{expect_one_row, now_millis, ownership_error};
use crate::tx::TxHandle;
use pubsync_core::errors::ExErrorKind;
use pubsync_core::model::{ContentStatus, PublishedRecord};
use pubsync_core::repository::{PublishedStore, StatusSync};
use pubsync_core_types::RequestContext;
use rusqlite::{Connection, OptionalExtension};

pub(crate) const TABLE: &str = "published_articles";

pub struct PublishedDao;

impl PublishedDao {
    /// Insert or replace by id; `created_at` survives replacement
    pub fn upsert(conn: &Connection, record: &PublishedRecord) -> Result<()> {
        let now = now_millis();
        conn.execute(
            "INSERT INTO published_articles (id, title, body, author_id, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                body = excluded.body,
                author_id = excluded.author_id,
                status = excluded.status,
                updated_at = excluded.updated_at",
            rusqlite::params![
                record.id,
                record.title,
                record.body,
                record.author_id,
                record.status,
                now
            ],
        )
        .map_err(|e| from_rusqlite(e).with_op("published.upsert").with_entity_id(record.id))?;

        Ok(())
    }

    pub fn upsert_tx(tx: &TxHandle<'_>, record: &PublishedRecord) -> Result<()> {
        Self::upsert(tx.conn()?, record)
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> Result<PublishedRecord> {
        conn.query_row(
            "SELECT id, title, body, author_id, status, created_at, updated_at
             FROM published_articles WHERE id = ?",
            [id],
            |row| {
                Ok(PublishedRecord {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    body: row.get(2)?,
                    author_id: row.get(3)?,
                    status: row.get(4)?,
                    created_at: row.get(5)?,
                    updated_at: row.get(6)?,
                })
            },
        )
        .optional()
        .map_err(|e| from_rusqlite(e).with_op("published.get_by_id"))?
        .ok_or_else(|| not_found("published.get_by_id", id))
    }

    /// Author-guarded status update; the row must exist
    pub fn sync_status(conn: &Connection, id: i64, author_id: i64, status: u8) -> Result<()> {
        let changed = Self::update_status(conn, id, author_id, status)
            .map_err(|e| e.with_op("published.sync_status"))?;
        expect_one_row(conn, changed, TABLE, "published.sync_status", id, author_id)
    }

    /// Author-guarded status update that tolerates a missing row
    ///
    /// Used after the draft row was already checked in the same
    /// transaction: an item saved but never published has no published row.
    pub fn mirror_status(conn: &Connection, id: i64, author_id: i64, status: u8) -> Result<usize> {
        Self::update_status(conn, id, author_id, status)
            .map_err(|e| e.with_op("published.mirror_status"))
    }

    /// Guarded status update where a missing row is not an error
    ///
    /// A row owned by another author is still `Forbidden`. Returns whether
    /// a row was changed.
    pub fn sync_status_if_present(
        conn: &Connection,
        id: i64,
        author_id: i64,
        status: u8,
    ) -> Result<bool> {
        let op = "published.sync_status_if_present";
        let changed =
            Self::update_status(conn, id, author_id, status).map_err(|e| e.with_op(op))?;
        if changed > 0 {
            return Ok(true);
        }
        let err = ownership_error(conn, TABLE, op, id, author_id);
        match err.kind() {
            ExErrorKind::NotFound => Ok(false),
            _ => Err(err),
        }
    }

    fn update_status(conn: &Connection, id: i64, author_id: i64, status: u8) -> Result<usize> {
        conn.execute(
            "UPDATE published_articles SET status = ?1, updated_at = ?2
             WHERE id = ?3 AND author_id = ?4",
            rusqlite::params![status, now_millis(), id, author_id],
        )
        .map_err(|e| from_rusqlite(e).with_entity_id(id))
    }

    pub fn count(conn: &Connection) -> Result<i64> {
        conn.query_row("SELECT count(*) FROM published_articles", [], |row| row.get(0))
            .map_err(from_rusqlite)
    }
}

/// Published store adapter over a shared connection
#[derive(Debug, Clone)]
pub struct SqlitePublishedStore {
    db: SharedConnection,
}

impl SqlitePublishedStore {
    pub fn new(db: SharedConnection) -> Self {
        Self { db }
    }
}

impl PublishedStore for SqlitePublishedStore {
    fn upsert(&self, ctx: &RequestContext, record: &PublishedRecord) -> Result<()> {
        self.db
            .call(ctx, "published.upsert", |conn| PublishedDao::upsert(conn, record))
    }

    fn get_by_id(&self, ctx: &RequestContext, id: i64) -> Result<PublishedRecord> {
        self.db
            .call(ctx, "published.get_by_id", |conn| PublishedDao::get_by_id(conn, id))
    }
}

impl StatusSync for SqlitePublishedStore {
    fn target(&self) -> &'static str {
        "published"
    }

    fn sync_status(
        &self,
        ctx: &RequestContext,
        id: i64,
        author_id: i64,
        status: ContentStatus,
    ) -> Result<()> {
        self.db.call(ctx, "published.sync_status", |conn| {
            PublishedDao::sync_status(conn, id, author_id, status.to_ordinal())
        })
    }
}

/// Status target for a published store that may lag its draft store
///
/// Items whose published write never landed have no row; withdrawing them
/// must still reach the draft store.
#[derive(Debug, Clone)]
pub struct PublishedStatusMirror {
    db: SharedConnection,
}

impl PublishedStatusMirror {
    pub fn new(db: SharedConnection) -> Self {
        Self { db }
    }
}

impl StatusSync for PublishedStatusMirror {
    fn target(&self) -> &'static str {
        "published"
    }

    fn sync_status(
        &self,
        ctx: &RequestContext,
        id: i64,
        author_id: i64,
        status: ContentStatus,
    ) -> Result<()> {
        let changed = self.db.call(ctx, "published.sync_status_if_present", |conn| {
            PublishedDao::sync_status_if_present(conn, id, author_id, status.to_ordinal())
        })?;
        if !changed {
            tracing::debug!(
                component = module_path!(),
                art_id = id,
                "no published row to update"
            );
        }
        Ok(())
    }
}
