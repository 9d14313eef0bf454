//! Combined draft + published storage over one database
//!
//! `ArticleDao` performs the whole sync inside one `TxHandle`; the
//! `SqliteArticleStore` adapter is the single store behind the delegated
//! strategy.

use crate::db::SharedConnection;
use crate::errors::Result;
use crate::repo::{DraftDao, PublishedDao};
use crate::tx::TxHandle;
use pubsync_core::model::{ContentStatus, DraftRecord, PublishedRecord};
use pubsync_core::repository::{ArticleRepository, StatusSync};
use pubsync_core_types::RequestContext;
use rusqlite::Connection;

pub struct ArticleDao;

impl ArticleDao {
    /// Write the draft and project it to the published table atomically
    pub fn sync(conn: &mut Connection, record: &DraftRecord) -> Result<i64> {
        let mut tx = TxHandle::begin(conn)?;
        let id = DraftDao::write_tx(&tx, record)?;

        let mut committed = record.clone();
        committed.id = id;
        PublishedDao::upsert_tx(&tx, &PublishedRecord::from_draft(&committed)?)?;

        tx.commit()?;
        Ok(id)
    }

    /// Guarded status change on the draft row, mirrored to the published row
    pub fn sync_status(conn: &mut Connection, id: i64, author_id: i64, status: u8) -> Result<()> {
        let mut tx = TxHandle::begin(conn)?;
        DraftDao::sync_status(tx.conn()?, id, author_id, status)?;
        PublishedDao::mirror_status(tx.conn()?, id, author_id, status)?;
        tx.commit()
    }
}

/// Single-store adapter: one database holding both tables
#[derive(Debug, Clone)]
pub struct SqliteArticleStore {
    db: SharedConnection,
}

impl SqliteArticleStore {
    pub fn new(db: SharedConnection) -> Self {
        Self { db }
    }
}

impl ArticleRepository for SqliteArticleStore {
    fn sync(&self, ctx: &RequestContext, record: &DraftRecord) -> Result<i64> {
        self.db
            .call(ctx, "article.sync", |conn| ArticleDao::sync(conn, record))
    }
}

impl StatusSync for SqliteArticleStore {
    fn target(&self) -> &'static str {
        "article"
    }

    fn sync_status(
        &self,
        ctx: &RequestContext,
        id: i64,
        author_id: i64,
        status: ContentStatus,
    ) -> Result<()> {
        self.db.call(ctx, "article.sync_status", |conn| {
            ArticleDao::sync_status(conn, id, author_id, status.to_ordinal())
        })
    }
}
