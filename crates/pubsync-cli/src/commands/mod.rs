//! Subcommand implementations

pub mod read;
pub mod write;

use pubsync_core::errors::{ExError, ExErrorKind, Result};
use pubsync_core::logging_facility;
use pubsync_core::SyncConfig;
use pubsync_core_types::{RequestContext, TraceId};
use pubsync_engine::{ArticleService, Deployment};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

/// A wired deployment plus the per-invocation request settings
pub struct Env {
    deployment: Deployment,
    timeout: Option<Duration>,
    trace_id: Option<String>,
}

impl Env {
    pub fn open(
        config_path: &Path,
        timeout_ms: Option<u64>,
        trace_id: Option<String>,
    ) -> Result<Self> {
        let config = SyncConfig::load(config_path)?;
        logging_facility::init(config.log_profile);
        Ok(Self {
            deployment: Deployment::open(&config)?,
            timeout: timeout_ms.map(Duration::from_millis),
            trace_id,
        })
    }

    pub fn service(&self) -> &ArticleService {
        self.deployment.service()
    }

    /// Fresh context for one request
    pub fn context(&self) -> RequestContext {
        let mut ctx = RequestContext::new();
        if let Some(trace_id) = &self.trace_id {
            ctx = ctx.with_trace_id(TraceId::from_string(trace_id.clone()));
        }
        match self.timeout {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx,
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(|e| {
        ExError::new(ExErrorKind::Unknown)
            .with_op("print_json")
            .with_message(e.to_string())
    })?;
    println!("{}", text);
    Ok(())
}
