use super::Synchronizer;
use pubsync_core::errors::Result;
use pubsync_core::model::DraftRecord;
use pubsync_core::repository::ArticleRepository;
use pubsync_core::SyncStrategyKind;
use pubsync_core_types::RequestContext;
use std::sync::Arc;

/// Forwards to a store that performs both writes itself
pub struct DelegatedSynchronizer {
    repo: Arc<dyn ArticleRepository>,
}

impl DelegatedSynchronizer {
    pub fn new(repo: Arc<dyn ArticleRepository>) -> Self {
        Self { repo }
    }
}

impl Synchronizer for DelegatedSynchronizer {
    fn strategy(&self) -> SyncStrategyKind {
        SyncStrategyKind::Delegated
    }

    fn sync(&self, ctx: &RequestContext, record: &DraftRecord) -> Result<i64> {
        self.repo.sync(ctx, record)
    }
}
