//! Trailing-edge debounce for edit-triggered analysis.
//!
//! Edits re-arm a single quiet-period timer; only the last edit inside the
//! window fires. Explicit user actions bypass the timer and fire at once,
//! cancelling anything pending.

use std::time::Duration;
use tokio::sync::mpsc;

use super::timer::CancellableTimer;

/// A request to schedule analysis of `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub text: String,
    /// Explicit user action: fire now instead of waiting for quiet.
    pub immediate: bool,
}

impl Trigger {
    pub fn debounced(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            immediate: false,
        }
    }

    pub fn immediate(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            immediate: true,
        }
    }
}

/// Delivered on the fire channel when the quiet period elapses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebounceFired {
    pub generation: u64,
    pub text: String,
}

pub struct DebounceScheduler {
    quiet_period: Duration,
    timer: CancellableTimer,
    generation: u64,
    armed_generation: Option<u64>,
    fire_tx: mpsc::UnboundedSender<DebounceFired>,
}

impl DebounceScheduler {
    pub fn new(quiet_period: Duration, fire_tx: mpsc::UnboundedSender<DebounceFired>) -> Self {
        Self {
            quiet_period,
            timer: CancellableTimer::new(),
            generation: 0,
            armed_generation: None,
            fire_tx,
        }
    }

    /// Schedule a trigger.
    ///
    /// Immediate triggers cancel any pending timer and are returned to the
    /// caller to submit synchronously. Debounced triggers (re)arm the timer
    /// and return `None`; the fire arrives later on the fire channel.
    pub fn schedule(&mut self, trigger: Trigger) -> Option<String> {
        if trigger.immediate {
            self.cancel();
            return Some(trigger.text);
        }

        self.generation += 1;
        let generation = self.generation;
        self.armed_generation = Some(generation);

        let tx = self.fire_tx.clone();
        let text = trigger.text;
        self.timer.arm(self.quiet_period, move || {
            // Receiver gone means the engine shut down; nothing to fire into.
            let _ = tx.send(DebounceFired { generation, text });
        });
        tracing::trace!(generation, "debounce armed");
        None
    }

    /// Cancel the pending timer, if any.
    pub fn cancel(&mut self) {
        if self.armed_generation.take().is_some() {
            self.timer.cancel();
            tracing::trace!(generation = self.generation, "debounce cancelled");
        }
    }

    /// Accept a fire delivered by the timer.
    ///
    /// Returns the text to submit only if the fire belongs to the currently
    /// armed generation. A fire that raced with a later re-arm or cancel is
    /// dropped, so a cancelled timer can never also fire.
    pub fn claim(&mut self, fired: DebounceFired) -> Option<String> {
        if self.armed_generation == Some(fired.generation) {
            self.armed_generation = None;
            Some(fired.text)
        } else {
            tracing::trace!(generation = fired.generation, "ignoring superseded debounce fire");
            None
        }
    }

    pub const fn is_pending(&self) -> bool {
        self.armed_generation.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(1000);

    async fn settle() {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    fn scheduler() -> (DebounceScheduler, mpsc::UnboundedReceiver<DebounceFired>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (DebounceScheduler::new(QUIET, tx), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_edits_coalesce_into_one_fire() {
        let (mut debounce, mut rx) = scheduler();

        for text in ["T", "Th", "The", "The news"] {
            assert_eq!(debounce.schedule(Trigger::debounced(text)), None);
            tokio::time::advance(Duration::from_millis(300)).await;
            settle().await;
        }
        assert!(rx.try_recv().is_err(), "nothing fires inside the quiet window");

        tokio::time::advance(QUIET).await;
        settle().await;

        let fired = rx.try_recv().expect("one fire after quiet period");
        assert_eq!(debounce.claim(fired), Some("The news".to_string()));
        assert!(rx.try_recv().is_err(), "exactly one fire");
        assert!(!debounce.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fire_waits_full_quiet_period() {
        let (mut debounce, mut rx) = scheduler();
        debounce.schedule(Trigger::debounced("draft"));

        tokio::time::advance(QUIET - Duration::from_millis(1)).await;
        settle().await;
        assert!(rx.try_recv().is_err());

        tokio::time::advance(Duration::from_millis(1)).await;
        settle().await;
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_cancels_pending_timer() {
        let (mut debounce, mut rx) = scheduler();
        debounce.schedule(Trigger::debounced("typed"));
        assert!(debounce.is_pending());

        let fired_now = debounce.schedule(Trigger::immediate("typed and analyzed"));
        assert_eq!(fired_now, Some("typed and analyzed".to_string()));
        assert!(!debounce.is_pending());

        tokio::time::advance(QUIET * 3).await;
        settle().await;
        assert!(rx.try_recv().is_err(), "cancelled timer must not fire");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_fire_is_not_claimed() {
        let (mut debounce, _rx) = scheduler();
        debounce.schedule(Trigger::debounced("first"));
        debounce.schedule(Trigger::debounced("second"));

        // A fire from the first generation that slipped into the channel.
        let late = DebounceFired {
            generation: 1,
            text: "first".to_string(),
        };
        assert_eq!(debounce.claim(late), None);
        assert!(debounce.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fire_after_cancel_is_not_claimed() {
        let (mut debounce, _rx) = scheduler();
        debounce.schedule(Trigger::debounced("gone"));
        debounce.cancel();

        let late = DebounceFired {
            generation: 1,
            text: "gone".to_string(),
        };
        assert_eq!(debounce.claim(late), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        {
            let mut debounce = DebounceScheduler::new(QUIET, tx);
            debounce.schedule(Trigger::debounced("disposed"));
        }

        tokio::time::advance(QUIET * 2).await;
        settle().await;
        assert!(rx.try_recv().is_err());
    }
}
