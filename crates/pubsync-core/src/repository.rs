//! Storage capabilities consumed by the synchronizer and the service
//!
//! Each trait is one store contract. Implementations must thread the
//! request context into every call and pass storage errors through with
//! their original kind.

use crate::errors::Result;
use crate::model::{ContentStatus, DraftRecord, PublishedRecord};
use pubsync_core_types::RequestContext;

/// Authoritative store for content as authored
pub trait DraftStore: Send + Sync {
    /// Insert a new row and return the identity the store assigned
    fn insert(&self, ctx: &RequestContext, record: &DraftRecord) -> Result<i64>;

    /// Replace the row matching `record.id`
    ///
    /// # Errors
    ///
    /// `NotFound` when the id does not exist, `Forbidden` when it belongs to
    /// another author.
    fn update_by_id(&self, ctx: &RequestContext, record: &DraftRecord) -> Result<()>;

    fn get_by_id(&self, ctx: &RequestContext, id: i64) -> Result<DraftRecord>;

    fn list_by_author(
        &self,
        ctx: &RequestContext,
        author_id: i64,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<DraftRecord>>;
}

/// Read-facing store keyed by the draft identity
pub trait PublishedStore: Send + Sync {
    /// Insert if absent, else replace the row with the same id. Idempotent.
    fn upsert(&self, ctx: &RequestContext, record: &PublishedRecord) -> Result<()>;

    fn get_by_id(&self, ctx: &RequestContext, id: i64) -> Result<PublishedRecord>;
}

/// Status-only update, guarded by author identity
pub trait StatusSync: Send + Sync {
    /// Short name used in logs
    fn target(&self) -> &'static str;

    /// # Errors
    ///
    /// `NotFound` when the id does not exist, `Forbidden` when the stored
    /// author differs. Neither case alters the stored status.
    fn sync_status(
        &self,
        ctx: &RequestContext,
        id: i64,
        author_id: i64,
        status: ContentStatus,
    ) -> Result<()>;
}

/// A single store that performs the draft and published writes itself
pub trait ArticleRepository: Send + Sync {
    fn sync(&self, ctx: &RequestContext, record: &DraftRecord) -> Result<i64>;
}

/// The create-or-update rule: `id == 0` inserts, anything else updates
///
/// Returns the identity the insert assigned, or the record's own id after
/// an update. Both the store trait path and transaction-bound DAO paths
/// route through here.
pub fn create_or_update<I, U>(record: &DraftRecord, insert: I, update: U) -> Result<i64>
where
    I: FnOnce() -> Result<i64>,
    U: FnOnce() -> Result<()>,
{
    if record.id == 0 {
        insert()
    } else {
        update()?;
        Ok(record.id)
    }
}

/// Create-or-update against the draft store, returning the stable identity
pub fn write_draft(
    store: &dyn DraftStore,
    ctx: &RequestContext,
    record: &DraftRecord,
) -> Result<i64> {
    create_or_update(
        record,
        || store.insert(ctx, record),
        || store.update_by_id(ctx, record),
    )
}
