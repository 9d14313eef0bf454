//! Database connection management
//!
//! A `SharedConnection` is the unit of sharing between store adapters:
//! adapters built over the same `SharedConnection` see one database and
//! can be written in one transaction. Every call goes through
//! `SharedConnection::call`, which checks the request context first and
//! arms an SQLite progress handler so a cancel or deadline interrupts a
//! running statement.

use crate::errors::{connection_poisoned, from_rusqlite, Result};
use crate::migrations::apply_migrations;
use pubsync_core::errors::{ensure_live, ExError, ExErrorKind};
use pubsync_core_types::{ContextState, RequestContext};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Progress handler granularity, in SQLite VM instructions
const INTERRUPT_CHECK_OPS: i32 = 1000;

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Configure a connection: foreign keys, WAL, busy timeout
pub fn configure(conn: &Connection, busy_timeout: Duration) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA journal_mode = WAL;")
        .map_err(from_rusqlite)?;
    conn.busy_timeout(busy_timeout).map_err(from_rusqlite)?;
    Ok(())
}

/// A connection shared by every adapter over one database
#[derive(Clone)]
pub struct SharedConnection {
    inner: Arc<Mutex<Connection>>,
}

impl SharedConnection {
    /// Wrap an already configured and migrated connection
    pub fn new(conn: Connection) -> Self {
        Self {
            inner: Arc::new(Mutex::new(conn)),
        }
    }

    /// Open, configure and migrate an on-disk database
    pub fn open(path: impl AsRef<Path>, busy_timeout: Duration) -> Result<Self> {
        let path = path.as_ref();
        let mut conn = open(path)?;
        configure(&conn, busy_timeout)?;
        apply_migrations(&mut conn)?;
        tracing::debug!(
            component = module_path!(),
            path = %path.display(),
            "database opened"
        );
        Ok(Self::new(conn))
    }

    /// Open and migrate a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = open_in_memory()?;
        apply_migrations(&mut conn)?;
        Ok(Self::new(conn))
    }

    /// Run `f` against the connection on behalf of `ctx`
    ///
    /// The lock is held for the whole of `f`, so a transaction opened
    /// inside `f` is never visible to, or shared with, a concurrent call.
    pub fn call<T, F>(&self, ctx: &RequestContext, op: &str, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        ensure_live(ctx, op)?;
        let mut conn = self.inner.lock().map_err(|_| connection_poisoned(op))?;
        // Waiting for the lock may have used up the deadline.
        ensure_live(ctx, op)?;

        arm_interrupt(&conn, ctx);
        let result = f(&mut conn);
        disarm_interrupt(&conn);

        result.map_err(|err| classify_interrupt(ctx, op, err))
    }
}

impl std::fmt::Debug for SharedConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedConnection").finish_non_exhaustive()
    }
}

fn arm_interrupt(conn: &Connection, ctx: &RequestContext) {
    let token = ctx.cancellation().clone();
    let deadline = ctx.deadline();
    conn.progress_handler(
        INTERRUPT_CHECK_OPS,
        Some(move || token.is_cancelled() || deadline.is_some_and(|d| Instant::now() >= d)),
    );
}

fn disarm_interrupt(conn: &Connection) {
    conn.progress_handler(0, None::<fn() -> bool>);
}

/// An interrupted statement reports Cancelled; tell the caller which signal fired
fn classify_interrupt(ctx: &RequestContext, op: &str, err: ExError) -> ExError {
    if err.kind() != ExErrorKind::Cancelled {
        return err;
    }
    match ctx.state() {
        ContextState::DeadlineExceeded => ExError::new(ExErrorKind::Timeout)
            .with_op(op.to_string())
            .with_request_id(ctx.request_id.clone())
            .with_message("deadline exceeded during store call")
            .with_source(err),
        _ => err.with_request_id(ctx.request_id.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pubsync_core_types::CancellationToken;

    #[test]
    fn test_call_runs_closure() {
        let db = SharedConnection::open_in_memory().unwrap();
        let ctx = RequestContext::new();
        let one: i64 = db
            .call(&ctx, "select_one", |conn| {
                conn.query_row("SELECT 1", [], |row| row.get(0))
                    .map_err(from_rusqlite)
            })
            .unwrap();
        assert_eq!(one, 1);
    }

    #[test]
    fn test_cancelled_context_never_reaches_database() {
        let db = SharedConnection::open_in_memory().unwrap();
        let token = CancellationToken::new();
        let ctx = RequestContext::new().with_cancellation(token.clone());
        token.cancel();

        let mut ran = false;
        let err = db
            .call(&ctx, "noop", |_| {
                ran = true;
                Ok(())
            })
            .unwrap_err();

        assert!(!ran);
        assert_eq!(err.kind(), ExErrorKind::Cancelled);
    }

    #[test]
    fn test_cancel_interrupts_running_statement() {
        let db = SharedConnection::open_in_memory().unwrap();
        let token = CancellationToken::new();
        let ctx = RequestContext::new().with_cancellation(token.clone());

        let err = db
            .call(&ctx, "long_query", |conn| {
                token.cancel();
                conn.query_row(
                    "WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM c WHERE x < 50000000)
                     SELECT count(*) FROM c",
                    [],
                    |row| row.get::<_, i64>(0),
                )
                .map_err(from_rusqlite)
            })
            .unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::Cancelled);
    }

    #[test]
    fn test_handler_is_disarmed_after_call() {
        let db = SharedConnection::open_in_memory().unwrap();
        let token = CancellationToken::new();
        let ctx = RequestContext::new().with_cancellation(token.clone());
        db.call(&ctx, "noop", |_| Ok(())).unwrap();
        token.cancel();

        let live = RequestContext::new();
        let count: i64 = db
            .call(&live, "count", |conn| {
                conn.query_row(
                    "WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM c WHERE x < 10000)
                     SELECT count(*) FROM c",
                    [],
                    |row| row.get(0),
                )
                .map_err(from_rusqlite)
            })
            .unwrap();
        assert_eq!(count, 10000);
    }
}
