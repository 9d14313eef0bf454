//! Status-only propagation
//!
//! Withdraw does not re-sync content: it pushes `Private` straight to each
//! store that holds status, in order, stopping at the first failure.

use pubsync_core::errors::Result;
use pubsync_core::model::ContentStatus;
use pubsync_core::repository::StatusSync;
use pubsync_core_types::RequestContext;
use std::sync::Arc;

pub struct StatusPropagator {
    targets: Vec<Arc<dyn StatusSync>>,
}

impl StatusPropagator {
    pub fn new(targets: Vec<Arc<dyn StatusSync>>) -> Self {
        Self { targets }
    }

    pub fn targets(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.targets.iter().map(|t| t.target())
    }

    /// # Errors
    ///
    /// `Forbidden`/`NotFound` from the first store that rejects the
    /// change. Stores later in the list are not touched.
    pub fn withdraw(&self, ctx: &RequestContext, author_id: i64, id: i64) -> Result<()> {
        self.propagate(ctx, author_id, id, ContentStatus::Private)
    }

    fn propagate(
        &self,
        ctx: &RequestContext,
        author_id: i64,
        id: i64,
        status: ContentStatus,
    ) -> Result<()> {
        for target in &self.targets {
            target.sync_status(ctx, id, author_id, status)?;
            tracing::debug!(
                component = module_path!(),
                target = target.target(),
                art_id = id,
                status = %status,
                "status propagated"
            );
        }
        Ok(())
    }
}
