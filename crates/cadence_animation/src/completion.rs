//! Awaitable animation completion

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::{AnimationError, Result};

/// Future returned by [`Animation::play_async`](crate::Animation::play_async)
///
/// Resolves with `Ok(())` when the animation completes, or with
/// [`AnimationError::Cancelled`] if its completion callback is dropped first
/// (by `reset()` or by the engine going away).
#[must_use = "futures do nothing unless awaited"]
pub struct PlayAsync {
    receiver: oneshot::Receiver<()>,
}

impl PlayAsync {
    pub(crate) fn new(receiver: oneshot::Receiver<()>) -> Self {
        Self { receiver }
    }
}

impl Future for PlayAsync {
    type Output = Result<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| received.map_err(|_| AnimationError::Cancelled))
    }
}
