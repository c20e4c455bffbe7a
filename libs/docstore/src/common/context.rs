use std::future::IntoFuture;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Why a bounded operation stopped before the store answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    #[error("Operation cancelled by caller")]
    Cancelled,

    #[error("Operation deadline exceeded")]
    DeadlineExceeded,
}

/// Caller-supplied bounds for a single store call.
///
/// Carries an optional deadline and a cancellation token. The store layer only
/// propagates a context, it never creates one on the caller's behalf.
///
/// # Example
///
/// ```
/// use docstore::RequestContext;
/// use std::time::Duration;
///
/// let ctx = RequestContext::with_timeout(Duration::from_secs(2));
/// let child = ctx.child();
/// ctx.cancellation_token().cancel();
/// assert!(child.is_cancelled());
/// ```
#[derive(Debug, Clone)]
pub struct RequestContext {
    deadline: Option<Instant>,
    cancel: CancellationToken,
}

impl RequestContext {
    /// No deadline and never cancelled unless the token is fired.
    pub fn background() -> Self {
        Self {
            deadline: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Expire `timeout` from now. A timeout too large to represent as an
    /// instant leaves the context unbounded.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now().checked_add(timeout),
            cancel: CancellationToken::new(),
        }
    }

    /// Expire at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            cancel: CancellationToken::new(),
        }
    }

    /// Stop when `token` is cancelled, with no deadline.
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            deadline: None,
            cancel: token,
        }
    }

    /// Add a timeout from now. The earlier of the two deadlines wins; an
    /// unrepresentable timeout leaves the current deadline as it is.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        if let Some(candidate) = Instant::now().checked_add(timeout) {
            self.deadline = Some(match self.deadline {
                Some(existing) => existing.min(candidate),
                None => candidate,
            });
        }
        self
    }

    /// Same deadline, child token: cancelling the parent cancels the child,
    /// not the other way around.
    pub fn child(&self) -> Self {
        Self {
            deadline: self.deadline,
            cancel: self.cancel.child_token(),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Time left before the deadline, `None` when unbounded.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    /// Fail fast if the context is already cancelled or expired.
    pub fn check(&self) -> Result<(), ContextError> {
        if self.cancel.is_cancelled() {
            return Err(ContextError::Cancelled);
        }
        match self.deadline {
            Some(at) if Instant::now() >= at => Err(ContextError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Drive `operation` until it completes, the token fires or the deadline
    /// passes, whichever comes first. The operation is dropped on interruption.
    ///
    /// Accepts anything awaitable, including the driver's action builders.
    pub async fn run<F>(&self, operation: F) -> Result<F::Output, ContextError>
    where
        F: IntoFuture,
    {
        self.check()?;
        let operation = operation.into_future();

        let expired = async {
            match self.deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ContextError::Cancelled),
            _ = expired => Err(ContextError::DeadlineExceeded),
            output = operation => Ok(output),
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::background()
    }
}
