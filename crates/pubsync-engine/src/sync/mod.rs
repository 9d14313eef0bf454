//! Create-or-update a draft, then propagate it to the published store
//!
//! Every strategy takes a draft record whose `id == 0` means create and
//! returns the stable identity. Which one runs is fixed when a deployment
//! is wired.

mod delegated;
mod independent;
mod retry;
mod shared_tx;

pub use delegated::DelegatedSynchronizer;
pub use independent::IndependentRetrySynchronizer;
pub use retry::RetryPolicy;
pub use shared_tx::SharedTransactionSynchronizer;

use pubsync_core::errors::Result;
use pubsync_core::model::DraftRecord;
use pubsync_core::SyncStrategyKind;
use pubsync_core_types::RequestContext;

pub trait Synchronizer: Send + Sync {
    fn strategy(&self) -> SyncStrategyKind;

    /// # Errors
    ///
    /// Draft failures pass through unchanged. A failure after the draft
    /// was written carries `committed_id` only when the strategy can leave
    /// partial state behind.
    fn sync(&self, ctx: &RequestContext, record: &DraftRecord) -> Result<i64>;
}
