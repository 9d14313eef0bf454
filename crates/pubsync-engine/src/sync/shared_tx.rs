//! Draft and published writes inside one transaction
//!
//! Both tables must live behind the same connection. The handle is opened
//! and finalized within a single `sync` call; any early return drops it
//! and rolls back.

use super::Synchronizer;
use pubsync_core::errors::{ensure_live, Result};
use pubsync_core::model::{DraftRecord, PublishedRecord};
use pubsync_core::SyncStrategyKind;
use pubsync_core_types::RequestContext;
use pubsync_store::repo::{DraftDao, PublishedDao};
use pubsync_store::{SharedConnection, TxHandle};

pub struct SharedTransactionSynchronizer {
    db: SharedConnection,
}

impl SharedTransactionSynchronizer {
    pub fn new(db: SharedConnection) -> Self {
        Self { db }
    }
}

impl Synchronizer for SharedTransactionSynchronizer {
    fn strategy(&self) -> SyncStrategyKind {
        SyncStrategyKind::SharedTransaction
    }

    fn sync(&self, ctx: &RequestContext, record: &DraftRecord) -> Result<i64> {
        self.db.call(ctx, "sync.shared_tx", |conn| {
            let mut tx = TxHandle::begin(conn)?;

            let id = DraftDao::write_tx(&tx, record)?;
            ensure_live(ctx, "sync.shared_tx")?;

            let mut committed = record.clone();
            committed.id = id;
            PublishedDao::upsert_tx(&tx, &PublishedRecord::from_draft(&committed)?)?;
            ensure_live(ctx, "sync.shared_tx")?;

            tx.commit()?;
            Ok(id)
        })
    }
}
