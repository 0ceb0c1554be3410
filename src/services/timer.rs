//! Cancellable one-shot timer.

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// A single pending timer backed by a tokio task.
///
/// At most one timer is pending at a time: [`arm`](Self::arm) cancels the
/// previous one before starting a new one, and dropping the handle cancels
/// whatever is still pending.
#[derive(Debug, Default)]
pub struct CancellableTimer {
    handle: Option<JoinHandle<()>>,
}

impl CancellableTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `on_fire` once `delay` has elapsed, replacing any pending timer.
    ///
    /// The deadline is fixed at the time of the call, not when the backing
    /// task is first polled.
    pub fn arm<F>(&mut self, delay: Duration, on_fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        let deadline = Instant::now() + delay;
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            on_fire();
        }));
    }

    /// Cancel the pending timer. Returns whether one was still pending.
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                was_pending
            }
            None => false,
        }
    }
}

impl Drop for CancellableTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
