use std::time::{Duration, Instant};

/// Whether the camera is being actively manipulated
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionState {
    Still,
    Moving,
}

/// Two-state timer: any pan/zoom input switches to `Moving`, and `Moving`
/// falls back to `Still` once `quiescence` has passed without input.
///
/// The transition back is driven by [`MotionTracker::poll`] from the frame
/// loop, so it happens even when no further input arrives.
#[derive(Clone, Debug)]
pub struct MotionTracker {
    state: MotionState,
    last_input: Option<Instant>,
    quiescence: Duration,
}

impl MotionTracker {
    pub fn new(quiescence: Duration) -> Self {
        Self {
            state: MotionState::Still,
            last_input: None,
            quiescence,
        }
    }

    /// Record a camera input at `now`
    pub fn note_input(&mut self, now: Instant) {
        self.state = MotionState::Moving;
        self.last_input = Some(now);
    }

    /// Advance the timer. Returns `true` when this call settled the camera,
    /// which is the caller's cue to redraw at full fidelity.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.state != MotionState::Moving {
            return false;
        }
        let settled = self
            .last_input
            .map_or(true, |t| now.saturating_duration_since(t) >= self.quiescence);
        if settled {
            self.state = MotionState::Still;
            self.last_input = None;
            tracing::trace!("camera settled");
        }
        settled
    }

    pub fn state(&self) -> MotionState {
        self.state
    }
}
