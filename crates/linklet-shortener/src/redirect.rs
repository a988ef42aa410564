use linklet_core::{LinkRecord, ShortenerError};
use std::future::Future;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;

/// How a scheduled redirect ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RedirectOutcome {
    /// The code resolved and a click was recorded; navigate to
    /// `original_url`.
    Resolved(LinkRecord),
    /// The redirect was abandoned before its delay elapsed. Nothing was
    /// read, mutated or persisted.
    Cancelled,
}

/// A redirect waiting out its delay before resolving.
///
/// Dropping the handle before the delay elapses cancels the redirect, the
/// same as calling [`cancel`](Self::cancel). Once the delay has elapsed the
/// resolution runs to completion.
#[derive(Debug)]
pub struct PendingRedirect {
    cancel: oneshot::Sender<()>,
    handle: JoinHandle<Result<RedirectOutcome, ShortenerError>>,
}

impl PendingRedirect {
    /// Runs `resolve` after `delay` unless cancelled first. `resolve` is
    /// not polled before the delay elapses.
    pub(crate) fn spawn<F>(delay: Duration, resolve: F) -> Self
    where
        F: Future<Output = Result<LinkRecord, ShortenerError>> + Send + 'static,
    {
        let (cancel, cancelled) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                // Fires on an explicit cancel and when the sender is dropped.
                _ = cancelled => {
                    debug!("redirect cancelled before delay elapsed");
                    Ok(RedirectOutcome::Cancelled)
                }
                _ = tokio::time::sleep(delay) => resolve.await.map(RedirectOutcome::Resolved),
            }
        });
        Self { cancel, handle }
    }

    /// Abandons the redirect.
    ///
    /// Has no effect if the delay already elapsed.
    pub fn cancel(self) {
        let _ = self.cancel.send(());
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the delay and the resolution.
    pub async fn wait(self) -> Result<RedirectOutcome, ShortenerError> {
        let PendingRedirect { cancel, handle } = self;
        let result = handle.await;
        // Keep the sender alive until the task is done so it is not taken as a cancel.
        drop(cancel);
        match result {
            Ok(outcome) => outcome,
            Err(err) if err.is_cancelled() => Ok(RedirectOutcome::Cancelled),
            Err(err) => std::panic::resume_unwind(err.into_panic()),
        }
    }
}
