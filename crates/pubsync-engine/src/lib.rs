//! pubsync engine - orchestration over the draft and published stores
//!
//! Provides:
//! - The `Synchronizer` capability and its three strategies
//! - The status propagator for withdraw
//! - The `ArticleService` facade
//! - Deployment wiring from `SyncConfig`

pub mod deployment;
pub mod service;
pub mod status;
pub mod sync;

pub use deployment::Deployment;
pub use service::{ArticleService, DEFAULT_PAGE_SIZE};
pub use status::StatusPropagator;
pub use sync::{
    DelegatedSynchronizer, IndependentRetrySynchronizer, RetryPolicy,
    SharedTransactionSynchronizer, Synchronizer,
};
