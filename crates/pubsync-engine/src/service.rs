//! Service facade
//!
//! The only inbound boundary. Converts between `ContentItem` and store
//! records, enforces the status transition table, and brackets every
//! operation with start and end/end_error log events.

use crate::status::StatusPropagator;
use crate::sync::Synchronizer;
use pubsync_core::errors::{ExError, Result};
use pubsync_core::model::{ContentItem, ContentStatus, DraftRecord};
use pubsync_core::repository::{write_draft, DraftStore, PublishedStore};
use pubsync_core::{log_op_end, log_op_error, log_op_start, SyncStrategyKind};
use pubsync_core_types::{RequestContext, TraceId};
use std::sync::Arc;
use std::time::Instant;

pub const DEFAULT_PAGE_SIZE: u32 = 20;

pub struct ArticleService {
    draft: Arc<dyn DraftStore>,
    published: Arc<dyn PublishedStore>,
    synchronizer: Box<dyn Synchronizer>,
    status: StatusPropagator,
}

impl ArticleService {
    pub fn new(
        draft: Arc<dyn DraftStore>,
        published: Arc<dyn PublishedStore>,
        synchronizer: Box<dyn Synchronizer>,
        status: StatusPropagator,
    ) -> Self {
        Self {
            draft,
            published,
            synchronizer,
            status,
        }
    }

    pub fn strategy(&self) -> SyncStrategyKind {
        self.synchronizer.strategy()
    }

    /// Store as a draft only; never touches the published store
    pub fn save(&self, ctx: &RequestContext, item: &ContentItem) -> Result<i64> {
        self.run(ctx, "save", || {
            let mut record = DraftRecord::from_item(item);
            record.status = ContentStatus::Unpublished.to_ordinal();
            write_draft(self.draft.as_ref(), ctx, &record)
        })
    }

    /// Mark as published and sync to the published store
    ///
    /// # Errors
    ///
    /// `InvalidTransition` when an existing item is `Private`. A partial
    /// failure returns an error with `committed_id` set.
    pub fn publish(&self, ctx: &RequestContext, item: &ContentItem) -> Result<i64> {
        self.run(ctx, "publish", || {
            if !item.is_new() {
                let current = self.draft.get_by_id(ctx, item.id)?;
                if current.author_id == item.author_id {
                    ContentStatus::from_ordinal(current.status)?
                        .ensure_transition(ContentStatus::Published, item.id)?;
                }
            }
            let mut record = DraftRecord::from_item(item);
            record.status = ContentStatus::Published.to_ordinal();
            self.synchronizer.sync(ctx, &record)
        })
    }

    /// Make a published item private in every store that holds status
    ///
    /// # Errors
    ///
    /// `Forbidden` when `author_id` does not own the item; stored status
    /// is left unchanged.
    pub fn withdraw(&self, ctx: &RequestContext, author_id: i64, id: i64) -> Result<()> {
        self.run(ctx, "withdraw", || {
            let current = self.draft.get_by_id(ctx, id)?;
            // Foreign items are left to the store guard so the caller learns
            // nothing about their status.
            if current.author_id == author_id {
                ContentStatus::from_ordinal(current.status)?
                    .ensure_transition(ContentStatus::Private, id)?;
            }
            self.status.withdraw(ctx, author_id, id)
        })
    }

    pub fn list(
        &self,
        ctx: &RequestContext,
        author_id: i64,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<ContentItem>> {
        self.run(ctx, "list", || {
            self.draft
                .list_by_author(ctx, author_id, offset, limit)?
                .into_iter()
                .map(DraftRecord::into_item)
                .collect()
        })
    }

    pub fn get_by_id(&self, ctx: &RequestContext, id: i64) -> Result<ContentItem> {
        self.run(ctx, "get_by_id", || self.draft.get_by_id(ctx, id)?.into_item())
    }

    pub fn get_published_by_id(&self, ctx: &RequestContext, id: i64) -> Result<ContentItem> {
        self.run(ctx, "get_published_by_id", || {
            self.published.get_by_id(ctx, id)?.into_item()
        })
    }

    fn run<T, F>(&self, ctx: &RequestContext, op: &'static str, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let start = Instant::now();
        let strategy = self.strategy();
        log_op_start!(
            op,
            request_id = ctx.request_id.as_str(),
            trace_id = ctx.trace_id.as_ref().map(TraceId::as_str),
            strategy = %strategy
        );

        match f() {
            Ok(value) => {
                let duration_ms = start.elapsed().as_millis() as u64;
                log_op_end!(
                    op,
                    duration_ms = duration_ms,
                    request_id = ctx.request_id.as_str()
                );
                Ok(value)
            }
            Err(err) => {
                let err = attach_request(err, ctx);
                let duration_ms = start.elapsed().as_millis() as u64;
                log_op_error!(
                    op,
                    &err,
                    duration_ms = duration_ms,
                    request_id = ctx.request_id.as_str()
                );
                Err(err)
            }
        }
    }
}

fn attach_request(err: ExError, ctx: &RequestContext) -> ExError {
    if err.request_id().is_some() {
        err
    } else {
        err.with_request_id(ctx.request_id.clone())
    }
}
