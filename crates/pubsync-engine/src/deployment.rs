//! Deployment wiring
//!
//! Opens the databases named by a `SyncConfig` and builds an
//! `ArticleService` with exactly one synchronizer strategy.

use crate::service::ArticleService;
use crate::status::StatusPropagator;
use crate::sync::{
    DelegatedSynchronizer, IndependentRetrySynchronizer, RetryPolicy,
    SharedTransactionSynchronizer,
};
use pubsync_core::errors::{ExError, ExErrorKind, Result};
use pubsync_core::failure::{FailureReporter, TracingFailureReporter};
use pubsync_core::repository::StatusSync;
use pubsync_core::{SyncConfig, SyncStrategyKind};
use pubsync_store::{
    PublishedStatusMirror, SharedConnection, SqliteArticleStore, SqliteDraftStore,
    SqlitePublishedStore,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub struct Deployment {
    service: ArticleService,
}

impl Deployment {
    /// Validate `config`, open its databases and wire the configured strategy
    pub fn open(config: &SyncConfig) -> Result<Self> {
        config.validate()?;
        let busy = Duration::from_millis(config.storage.busy_timeout_ms);

        let service = match config.strategy {
            SyncStrategyKind::Delegated => {
                let path = required(config.storage.path.as_deref(), "path")?;
                delegated(SharedConnection::open(path, busy)?)
            }
            SyncStrategyKind::SharedTransaction => {
                let path = required(config.storage.path.as_deref(), "path")?;
                shared_transaction(SharedConnection::open(path, busy)?)
            }
            SyncStrategyKind::IndependentRetry => {
                let draft_path = required(config.storage.draft_path.as_deref(), "draft_path")?;
                let published_path =
                    required(config.storage.published_path.as_deref(), "published_path")?;
                independent_retry(
                    SharedConnection::open(draft_path, busy)?,
                    SharedConnection::open(published_path, busy)?,
                    Arc::new(TracingFailureReporter),
                    RetryPolicy::new(config.retry_attempts),
                )
            }
        };

        tracing::info!(
            component = module_path!(),
            strategy = %config.strategy,
            "deployment wired"
        );
        Ok(Self { service })
    }

    pub fn service(&self) -> &ArticleService {
        &self.service
    }

    pub fn into_service(self) -> ArticleService {
        self.service
    }
}

/// One store performs both writes; status changes go through the same store
pub fn delegated(db: SharedConnection) -> ArticleService {
    let article = Arc::new(SqliteArticleStore::new(db.clone()));
    ArticleService::new(
        Arc::new(SqliteDraftStore::new(db.clone())),
        Arc::new(SqlitePublishedStore::new(db)),
        Box::new(DelegatedSynchronizer::new(article.clone())),
        StatusPropagator::new(vec![article as Arc<dyn StatusSync>]),
    )
}

/// Both tables on one connection, synced in a single transaction
pub fn shared_transaction(db: SharedConnection) -> ArticleService {
    let status: Arc<dyn StatusSync> = Arc::new(SqliteArticleStore::new(db.clone()));
    ArticleService::new(
        Arc::new(SqliteDraftStore::new(db.clone())),
        Arc::new(SqlitePublishedStore::new(db.clone())),
        Box::new(SharedTransactionSynchronizer::new(db)),
        StatusPropagator::new(vec![status]),
    )
}

/// Two databases; the published write is retried under `policy`
pub fn independent_retry(
    draft_db: SharedConnection,
    published_db: SharedConnection,
    reporter: Arc<dyn FailureReporter>,
    policy: RetryPolicy,
) -> ArticleService {
    let status = independent_status(draft_db.clone(), published_db.clone());
    let draft = Arc::new(SqliteDraftStore::new(draft_db));
    let published = Arc::new(SqlitePublishedStore::new(published_db));
    ArticleService::new(
        draft.clone(),
        published.clone(),
        Box::new(IndependentRetrySynchronizer::new(
            draft.clone(),
            published.clone(),
            reporter,
            policy,
        )),
        status,
    )
}

/// Withdraw targets for two independent databases
///
/// The published store goes first so readers stop seeing the item before
/// the draft changes. A draft whose publish never landed has no published
/// row; that is skipped rather than failing the withdraw.
pub fn independent_status(
    draft_db: SharedConnection,
    published_db: SharedConnection,
) -> StatusPropagator {
    StatusPropagator::new(vec![
        Arc::new(PublishedStatusMirror::new(published_db)) as Arc<dyn StatusSync>,
        Arc::new(SqliteDraftStore::new(draft_db)) as Arc<dyn StatusSync>,
    ])
}

fn required<'a>(path: Option<&'a Path>, field: &str) -> Result<&'a Path> {
    path.ok_or_else(|| {
        ExError::new(ExErrorKind::Config)
            .with_op("deployment_open")
            .with_message(format!("missing storage.{}", field))
    })
}
