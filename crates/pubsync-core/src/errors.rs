use pubsync_core_types::{ContextState, RequestContext, RequestId};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Store adapters report one of the opaque storage kinds (NotFound,
/// Forbidden, Conflict, Unavailable, Unknown). The remaining kinds are
/// raised above the storage boundary. Each kind maps to a stable code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExErrorKind {
    // Storage boundary
    NotFound,
    Forbidden,
    Conflict,
    Unavailable,
    Unknown,

    // Validation
    InvalidInput,
    InvalidTransition,

    // Request lifecycle
    Cancelled,
    Timeout,

    // Deployment
    Config,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Forbidden => "ERR_FORBIDDEN",
            ExErrorKind::Conflict => "ERR_CONFLICT",
            ExErrorKind::Unavailable => "ERR_UNAVAILABLE",
            ExErrorKind::Unknown => "ERR_UNKNOWN",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidTransition => "ERR_INVALID_TRANSITION",
            ExErrorKind::Cancelled => "ERR_CANCELLED",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::Config => "ERR_CONFIG",
        }
    }

    /// Whether a failed write of this kind is worth attempting again
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            ExErrorKind::Cancelled
                | ExErrorKind::Timeout
                | ExErrorKind::InvalidInput
                | ExErrorKind::InvalidTransition
                | ExErrorKind::Forbidden
                | ExErrorKind::Config
        )
    }
}

/// Canonical structured error type
///
/// `committed_id` is only set when the draft write of a sync committed but
/// the published write did not. A caller holding such an error knows the
/// draft exists under that id.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<i64>,
    author_id: Option<i64>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<ExError>>,
    committed_id: Option<i64>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            author_id: None,
            request_id: None,
            message: String::new(),
            source: None,
            committed_id: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add article ID context
    pub fn with_entity_id(mut self, id: i64) -> Self {
        self.entity_id = Some(id);
        self
    }

    /// Add author ID context
    pub fn with_author_id(mut self, id: i64) -> Self {
        self.author_id = Some(id);
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Mark the error as a partial failure: the draft under `id` is committed
    pub fn with_committed_id(mut self, id: i64) -> Self {
        self.committed_id = Some(id);
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<i64> {
        self.entity_id
    }

    pub fn author_id(&self) -> Option<i64> {
        self.author_id
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }

    /// Identity of the draft that committed before the failure, if any
    pub fn committed_id(&self) -> Option<i64> {
        self.committed_id
    }

    /// True when the draft store holds the write and the published store does not
    pub fn is_partial(&self) -> bool {
        self.committed_id.is_some()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(id) = self.entity_id {
            write!(f, " (art_id: {})", id)?;
        }
        if let Some(author_id) = self.author_id {
            write!(f, " (author_id: {})", author_id)?;
        }
        if let Some(id) = self.committed_id {
            write!(f, " (partial: draft {} committed, published write failed)", id)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Fail fast when the caller has cancelled or the deadline has passed
pub fn ensure_live(ctx: &RequestContext, op: &str) -> Result<()> {
    match ctx.state() {
        ContextState::Live => Ok(()),
        ContextState::Cancelled => Err(ExError::new(ExErrorKind::Cancelled)
            .with_op(op)
            .with_request_id(ctx.request_id.clone())
            .with_message("request cancelled")),
        ContextState::DeadlineExceeded => Err(ExError::new(ExErrorKind::Timeout)
            .with_op(op)
            .with_request_id(ctx.request_id.clone())
            .with_message("deadline exceeded")),
    }
}

impl From<crate::config::ConfigError> for ExError {
    fn from(err: crate::config::ConfigError) -> Self {
        ExError::new(ExErrorKind::Config)
            .with_op("load_config")
            .with_message(err.to_string())
    }
}
