//! Repository layer: DAOs over a connection and store adapters over a
//! `SharedConnection`
//!
//! DAO functions take `&Connection` (or a `TxHandle` for the `_tx`
//! variants) and do no locking. Store adapters lock the shared connection
//! per call and implement the `pubsync_core::repository` traits.

pub mod article;
pub mod draft;
pub mod published;

pub use article::{ArticleDao, SqliteArticleStore};
pub use draft::{DraftDao, SqliteDraftStore};
pub use published::{PublishedDao, PublishedStatusMirror, SqlitePublishedStore};

use crate::errors::{forbidden, from_rusqlite, not_found, Result};
use pubsync_core::errors::ExError;
use rusqlite::{Connection, OptionalExtension};

pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Explain why a guarded `UPDATE ... WHERE id = ? AND author_id = ?` touched no row
///
/// `table` is one of the crate's own table names, never caller input.
pub(crate) fn ownership_error(
    conn: &Connection,
    table: &str,
    op: &str,
    id: i64,
    author_id: i64,
) -> ExError {
    let sql = format!("SELECT author_id FROM {} WHERE id = ?", table);
    let owner: std::result::Result<Option<i64>, _> =
        conn.query_row(&sql, [id], |row| row.get(0)).optional();
    match owner {
        Ok(None) => not_found(op, id),
        Ok(Some(_)) => forbidden(op, id, author_id),
        Err(err) => from_rusqlite(err).with_op(op.to_string()).with_entity_id(id),
    }
}

/// Turn a zero-row guarded update into NotFound/Forbidden
pub(crate) fn expect_one_row(
    conn: &Connection,
    changed: usize,
    table: &str,
    op: &str,
    id: i64,
    author_id: i64,
) -> Result<()> {
    if changed == 0 {
        Err(ownership_error(conn, table, op, id, author_id))
    } else {
        Ok(())
    }
}
