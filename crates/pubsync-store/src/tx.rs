//! Explicit transaction handle
//!
//! `TxHandle` moves through `Active → Committed | RolledBack` exactly once.
//! Dropping an active handle rolls it back, so a handle opened at the top
//! of a function is released on every exit path. Rolling back a handle that
//! is already finalized is a no-op that succeeds.

use crate::errors::{from_rusqlite, Result};
use pubsync_core::errors::{ExError, ExErrorKind};
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// State of a transaction handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    Active,
    Committed,
    RolledBack,
}

pub struct TxHandle<'conn> {
    tx: Option<Transaction<'conn>>,
    state: TxState,
}

impl<'conn> TxHandle<'conn> {
    /// Begin an IMMEDIATE transaction, taking the write lock up front
    pub fn begin(conn: &'conn mut Connection) -> Result<Self> {
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(from_rusqlite)?;
        Ok(Self {
            tx: Some(tx),
            state: TxState::Active,
        })
    }

    pub fn state(&self) -> TxState {
        self.state
    }

    /// Connection bound to this transaction
    pub fn conn(&self) -> Result<&Connection> {
        self.tx.as_deref().ok_or_else(|| finalized("tx_conn", self.state))
    }

    /// # Errors
    ///
    /// Fails if the handle is already finalized, or if SQLite refuses the
    /// commit (the handle then counts as rolled back).
    pub fn commit(&mut self) -> Result<()> {
        let tx = self.tx.take().ok_or_else(|| finalized("tx_commit", self.state))?;
        match tx.commit() {
            Ok(()) => {
                self.state = TxState::Committed;
                Ok(())
            }
            Err(err) => {
                self.state = TxState::RolledBack;
                Err(from_rusqlite(err).with_op("tx_commit"))
            }
        }
    }

    /// Roll back an active transaction; no-op once finalized
    pub fn rollback(&mut self) -> Result<()> {
        match self.tx.take() {
            Some(tx) => {
                self.state = TxState::RolledBack;
                tx.rollback().map_err(|e| from_rusqlite(e).with_op("tx_rollback"))
            }
            None => Ok(()),
        }
    }
}

impl Drop for TxHandle<'_> {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            match tx.rollback() {
                Ok(()) => tracing::debug!(component = module_path!(), "deferred rollback"),
                Err(err) => tracing::warn!(
                    component = module_path!(),
                    error = %err,
                    "deferred rollback failed"
                ),
            }
        }
    }
}

fn finalized(op: &str, state: TxState) -> ExError {
    ExError::new(ExErrorKind::Unknown)
        .with_op(op.to_string())
        .with_message(format!("transaction already finalized ({:?})", state))
}
