use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{VectorError, VectorResult};

/// Per-call cancellation and deadline
///
/// Every client operation runs inside a context. When the token is cancelled
/// or the deadline passes, the pending engine call is dropped (which resets
/// its HTTP/2 stream) and the operation returns [`VectorError::Cancelled`] or
/// [`VectorError::DeadlineExceeded`].
///
/// Contexts are cheap to clone; clones share the same token.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    token: CancellationToken,
    deadline: Option<(Instant, Duration)>,
}

impl RequestContext {
    /// A context that never cancels and has no deadline
    pub fn background() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().timeout(timeout)
    }

    /// A context bound to a caller-owned cancellation token
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Add (or replace) a deadline `timeout` from now
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some((Instant::now() + timeout, timeout));
        self
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Fail fast when the context is already done
    pub fn check(&self) -> VectorResult<()> {
        if self.token.is_cancelled() {
            return Err(VectorError::Cancelled);
        }
        match self.deadline {
            Some((deadline, budget)) if Instant::now() >= deadline => {
                Err(VectorError::DeadlineExceeded(budget))
            }
            _ => Ok(()),
        }
    }

    /// Run an engine call under this context
    ///
    /// The call is only started when the context is still live.
    pub async fn run<F, Fut, T>(&self, call: F) -> VectorResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = VectorResult<T>>,
    {
        self.check()?;

        let call = call();
        match self.deadline {
            Some((deadline, budget)) => {
                tokio::select! {
                    biased;
                    _ = self.token.cancelled() => Err(VectorError::Cancelled),
                    _ = tokio::time::sleep_until(deadline) => {
                        Err(VectorError::DeadlineExceeded(budget))
                    }
                    result = call => result,
                }
            }
            None => {
                tokio::select! {
                    biased;
                    _ = self.token.cancelled() => Err(VectorError::Cancelled),
                    result = call => result,
                }
            }
        }
    }
}
