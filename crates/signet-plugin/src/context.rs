//! Invocation context forwarded to every plugin call.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::{PluginError, PluginResult};

/// Cancellation and timeout scope for plugin invocations.
///
/// Cloning shares the cancellation token, so cancelling any clone aborts
/// every in-flight call made with it.
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancel: CancellationToken,
    timeout: Option<Duration>,
}

impl Context {
    /// Creates a context that is never cancelled on its own.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context bound to an existing cancellation token.
    #[must_use]
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            cancel: token,
            timeout: None,
        }
    }

    /// Sets a per-invocation timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns a context cancelled together with this one, but which can
    /// also be cancelled on its own.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            cancel: self.cancel.child_token(),
            timeout: self.timeout,
        }
    }

    /// Returns the cancellation token, for handing to subprocess or I/O code.
    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Returns the configured timeout.
    #[must_use]
    pub fn timeout_duration(&self) -> Option<Duration> {
        self.timeout
    }

    /// Cancels this context and every child.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Drives `fut` until it completes, the context is cancelled, or the
    /// timeout elapses.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Cancelled`] or [`PluginError::TimedOut`] when the
    /// invocation is aborted, otherwise whatever `fut` returns.
    pub async fn run<T, F>(&self, fut: F) -> PluginResult<T>
    where
        F: Future<Output = PluginResult<T>>,
    {
        if self.is_cancelled() {
            return Err(PluginError::Cancelled);
        }

        let bounded = async {
            match self.timeout {
                Some(limit) => tokio::time::timeout(limit, fut)
                    .await
                    .unwrap_or(Err(PluginError::TimedOut(limit))),
                None => fut.await,
            }
        };

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(PluginError::Cancelled),
            result = bounded => result,
        }
    }
}
