use pubsync_core::config::DEFAULT_RETRY_ATTEMPTS;
use pubsync_core::errors::ExError;
use pubsync_core_types::RequestContext;

/// Bound on published-write attempts; retries are immediate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl RetryPolicy {
    /// A bound of 0 is raised to 1: the write is always attempted once
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Whether another attempt follows the failed `attempt` (1-based)
    pub fn should_retry(&self, attempt: u32, err: &ExError, ctx: &RequestContext) -> bool {
        attempt < self.max_attempts && err.kind().is_retryable() && !ctx.is_done()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_ATTEMPTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pubsync_core::errors::ExErrorKind;

    #[test]
    fn test_zero_bound_is_one_attempt() {
        assert_eq!(RetryPolicy::new(0).max_attempts(), 1);
    }

    #[test]
    fn test_default_bound_is_three() {
        assert_eq!(RetryPolicy::default().max_attempts(), 3);
    }

    #[test]
    fn test_retries_until_bound() {
        let policy = RetryPolicy::new(3);
        let ctx = RequestContext::new();
        let err = ExError::new(ExErrorKind::Unavailable);
        assert!(policy.should_retry(1, &err, &ctx));
        assert!(policy.should_retry(2, &err, &ctx));
        assert!(!policy.should_retry(3, &err, &ctx));
    }

    #[test]
    fn test_no_retry_after_cancel_or_forbidden() {
        let policy = RetryPolicy::new(3);
        let ctx = RequestContext::new();
        assert!(!policy.should_retry(1, &ExError::new(ExErrorKind::Forbidden), &ctx));
        assert!(!policy.should_retry(1, &ExError::new(ExErrorKind::Cancelled), &ctx));

        ctx.cancellation().cancel();
        assert!(!policy.should_retry(1, &ExError::new(ExErrorKind::Unavailable), &ctx));
    }
}
