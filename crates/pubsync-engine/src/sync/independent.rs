//! Independent stores with a bounded published-write retry
//!
//! The draft write decides the identity. If the published write never
//! succeeds the draft stays committed and the returned error carries that
//! identity, so the caller can tell "nothing happened" apart from
//! "draft committed, publish did not".

use super::{RetryPolicy, Synchronizer};
use pubsync_core::errors::{ExError, Result};
use pubsync_core::failure::{FailureReporter, Field};
use pubsync_core::model::{DraftRecord, PublishedRecord};
use pubsync_core::repository::{write_draft, DraftStore, PublishedStore};
use pubsync_core::types::schema::{
    FIELD_ARTICLE_ID, FIELD_ATTEMPT, FIELD_AUTHOR_ID, FIELD_MAX_ATTEMPTS, FIELD_REQUEST_ID,
    FIELD_STRATEGY, FIELD_TRACE_ID,
};
use pubsync_core::SyncStrategyKind;
use pubsync_core_types::RequestContext;
use std::sync::Arc;

pub struct IndependentRetrySynchronizer {
    draft: Arc<dyn DraftStore>,
    published: Arc<dyn PublishedStore>,
    reporter: Arc<dyn FailureReporter>,
    policy: RetryPolicy,
}

impl IndependentRetrySynchronizer {
    pub fn new(
        draft: Arc<dyn DraftStore>,
        published: Arc<dyn PublishedStore>,
        reporter: Arc<dyn FailureReporter>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            draft,
            published,
            reporter,
            policy,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    fn publish_with_retry(&self, ctx: &RequestContext, record: &PublishedRecord) -> Result<()> {
        let mut attempt = 1;
        loop {
            let err = match self.published.upsert(ctx, record) {
                Ok(()) => return Ok(()),
                Err(err) => err,
            };

            self.reporter.record_failure(
                "published store write failed",
                &attempt_fields(ctx, record, attempt, self.policy.max_attempts()),
                &err,
            );

            if !self.policy.should_retry(attempt, &err, ctx) {
                return Err(err);
            }
            tracing::debug!(
                component = module_path!(),
                art_id = record.id,
                attempt,
                "retrying published write"
            );
            attempt += 1;
        }
    }
}

impl Synchronizer for IndependentRetrySynchronizer {
    fn strategy(&self) -> SyncStrategyKind {
        SyncStrategyKind::IndependentRetry
    }

    fn sync(&self, ctx: &RequestContext, record: &DraftRecord) -> Result<i64> {
        let id = write_draft(self.draft.as_ref(), ctx, record)?;

        let mut committed = record.clone();
        committed.id = id;
        let projected = PublishedRecord::from_draft(&committed).map_err(|e| partial(e, id))?;

        self.publish_with_retry(ctx, &projected)
            .map_err(|e| partial(e, id))?;
        Ok(id)
    }
}

fn attempt_fields(
    ctx: &RequestContext,
    record: &PublishedRecord,
    attempt: u32,
    max_attempts: u32,
) -> Vec<Field> {
    let mut fields = vec![
        Field::new(FIELD_ARTICLE_ID, record.id),
        Field::new(FIELD_AUTHOR_ID, record.author_id),
        Field::new(FIELD_ATTEMPT, attempt),
        Field::new(FIELD_MAX_ATTEMPTS, max_attempts),
        Field::new(FIELD_STRATEGY, SyncStrategyKind::IndependentRetry),
        Field::new(FIELD_REQUEST_ID, ctx.request_id.as_str()),
    ];
    if let Some(trace_id) = &ctx.trace_id {
        fields.push(Field::new(FIELD_TRACE_ID, trace_id.as_str()));
    }
    fields
}

fn partial(err: ExError, id: i64) -> ExError {
    err.with_committed_id(id)
}
