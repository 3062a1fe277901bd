use std::time::{Duration, Instant};

/// Trailing-edge debouncer: coalesces a burst of values into the last one,
/// released once `window` has passed since the most recent push.
#[derive(Clone, Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Replace any pending value and restart the window
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// Take the pending value if its window has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let ready = matches!(
            &self.pending,
            Some((_, at)) if now.saturating_duration_since(*at) >= self.window
        );
        if ready {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }
}
