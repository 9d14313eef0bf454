//! pubsync store - SQLite persistence for the draft and published stores
//!
//! Provides:
//! - Connection management with per-call cancellation
//! - Embedded migrations with checksums
//! - An explicit transaction handle
//! - DAOs and store adapters for draft, published and combined storage

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;
pub mod tx;

pub use db::SharedConnection;
pub use errors::Result;
pub use repo::{
    PublishedStatusMirror, SqliteArticleStore, SqliteDraftStore, SqlitePublishedStore,
};
pub use tx::{TxHandle, TxState};
