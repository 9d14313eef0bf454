//! Draft store
//!
//! `draft_articles` assigns identities (AUTOINCREMENT, never reused) and
//! guards every update by author.

use crate::db::SharedConnection;
use crate::errors::{from_rusqlite, not_found, Result};
use crate::repo::{expect_one_row, now_millis};
use crate::tx::TxHandle;
use pubsync_core::model::{ContentStatus, DraftRecord};
use pubsync_core::repository::{create_or_update, DraftStore, StatusSync};
use pubsync_core_types::RequestContext;
use rusqlite::{Connection, OptionalExtension, Row};

pub(crate) const TABLE: &str = "draft_articles";

const SELECT_COLUMNS: &str =
    "SELECT id, title, body, author_id, status, created_at, updated_at FROM draft_articles";

fn map_row(row: &Row<'_>) -> rusqlite::Result<DraftRecord> {
    Ok(DraftRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        body: row.get(2)?,
        author_id: row.get(3)?,
        status: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

/// Draft-table statements
pub struct DraftDao;

impl DraftDao {
    /// Insert a new draft; the record's own id is ignored
    pub fn insert(conn: &Connection, record: &DraftRecord) -> Result<i64> {
        let now = now_millis();
        conn.execute(
            "INSERT INTO draft_articles (title, body, author_id, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            rusqlite::params![
                record.title,
                record.body,
                record.author_id,
                record.status,
                now
            ],
        )
        .map_err(|e| from_rusqlite(e).with_op("draft.insert"))?;

        Ok(conn.last_insert_rowid())
    }

    /// Replace title, body and status of an existing draft owned by `record.author_id`
    pub fn update_by_id(conn: &Connection, record: &DraftRecord) -> Result<()> {
        let changed = conn
            .execute(
                "UPDATE draft_articles
                 SET title = ?1, body = ?2, status = ?3, updated_at = ?4
                 WHERE id = ?5 AND author_id = ?6",
                rusqlite::params![
                    record.title,
                    record.body,
                    record.status,
                    now_millis(),
                    record.id,
                    record.author_id
                ],
            )
            .map_err(|e| from_rusqlite(e).with_op("draft.update_by_id").with_entity_id(record.id))?;

        expect_one_row(conn, changed, TABLE, "draft.update_by_id", record.id, record.author_id)
    }

    /// Insert when `record.id == 0`, else update; returns the stable id
    pub fn write(conn: &Connection, record: &DraftRecord) -> Result<i64> {
        create_or_update(
            record,
            || Self::insert(conn, record),
            || Self::update_by_id(conn, record),
        )
    }

    pub fn write_tx(tx: &TxHandle<'_>, record: &DraftRecord) -> Result<i64> {
        Self::write(tx.conn()?, record)
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> Result<DraftRecord> {
        conn.query_row(&format!("{} WHERE id = ?", SELECT_COLUMNS), [id], map_row)
            .optional()
            .map_err(|e| from_rusqlite(e).with_op("draft.get_by_id"))?
            .ok_or_else(|| not_found("draft.get_by_id", id))
    }

    /// Newest first
    pub fn list_by_author(
        conn: &Connection,
        author_id: i64,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<DraftRecord>> {
        let mut stmt = conn
            .prepare(&format!(
                "{} WHERE author_id = ?1 ORDER BY updated_at DESC, id DESC LIMIT ?2 OFFSET ?3",
                SELECT_COLUMNS
            ))
            .map_err(from_rusqlite)?;
        let rows = stmt
            .query_map(rusqlite::params![author_id, limit, offset], map_row)
            .map_err(from_rusqlite)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| from_rusqlite(e).with_op("draft.list_by_author"))?;
        Ok(rows)
    }

    /// Set only the status of a draft owned by `author_id`
    pub fn sync_status(conn: &Connection, id: i64, author_id: i64, status: u8) -> Result<()> {
        let changed = conn
            .execute(
                "UPDATE draft_articles SET status = ?1, updated_at = ?2
                 WHERE id = ?3 AND author_id = ?4",
                rusqlite::params![status, now_millis(), id, author_id],
            )
            .map_err(|e| from_rusqlite(e).with_op("draft.sync_status").with_entity_id(id))?;

        expect_one_row(conn, changed, TABLE, "draft.sync_status", id, author_id)
    }

    pub fn count(conn: &Connection) -> Result<i64> {
        conn.query_row("SELECT count(*) FROM draft_articles", [], |row| row.get(0))
            .map_err(from_rusqlite)
    }
}

/// Draft store adapter over a shared connection
#[derive(Debug, Clone)]
pub struct SqliteDraftStore {
    db: SharedConnection,
}

impl SqliteDraftStore {
    pub fn new(db: SharedConnection) -> Self {
        Self { db }
    }
}

impl DraftStore for SqliteDraftStore {
    fn insert(&self, ctx: &RequestContext, record: &DraftRecord) -> Result<i64> {
        self.db
            .call(ctx, "draft.insert", |conn| DraftDao::insert(conn, record))
    }

    fn update_by_id(&self, ctx: &RequestContext, record: &DraftRecord) -> Result<()> {
        self.db
            .call(ctx, "draft.update_by_id", |conn| DraftDao::update_by_id(conn, record))
    }

    fn get_by_id(&self, ctx: &RequestContext, id: i64) -> Result<DraftRecord> {
        self.db
            .call(ctx, "draft.get_by_id", |conn| DraftDao::get_by_id(conn, id))
    }

    fn list_by_author(
        &self,
        ctx: &RequestContext,
        author_id: i64,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<DraftRecord>> {
        self.db.call(ctx, "draft.list_by_author", |conn| {
            DraftDao::list_by_author(conn, author_id, offset, limit)
        })
    }
}

impl StatusSync for SqliteDraftStore {
    fn target(&self) -> &'static str {
        "draft"
    }

    fn sync_status(
        &self,
        ctx: &RequestContext,
        id: i64,
        author_id: i64,
        status: ContentStatus,
    ) -> Result<()> {
        self.db.call(ctx, "draft.sync_status", |conn| {
            DraftDao::sync_status(conn, id, author_id, status.to_ordinal())
        })
    }
}
