//! Wall-clock frame pacing, decoupled from the host refresh rate.
//!
//! The pacer never blocks and never reads the clock itself; the caller feeds
//! it the current time each loop iteration and either performs one
//! simulation+render step or yields for the suggested hint. That keeps the
//! decision logic callable from any scheduling model and testable with a
//! synthetic clock.

use std::time::Duration;

use thiserror::Error;

use crate::constants::{MAX_TICKS_PER_STEP, SAMPLE_WINDOW_SECS, YIELD_HINT};

#[derive(Debug, Error)]
pub enum PacingError {
    #[error("target fps must be positive, got {0}")]
    InvalidTargetFps(f64),
}

/// Outcome of one pacing decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacerDecision {
    /// Not enough time has elapsed; the caller should sleep for roughly
    /// `hint` and poll again.
    Wait { hint: Duration },
    /// Perform one simulation+render step, advancing the motion generator by
    /// `delta_ticks`.
    Ready { delta_ticks: u32 },
}

pub struct FramePacer {
    target_interval: f64,
    last_frame_time: Option<f64>,
    frame_counter: u32,
    window_start: Option<f64>,
    sample_window: f64,
    max_ticks_per_step: u32,
}

impl FramePacer {
    pub fn new(target_fps: f64) -> Result<Self, PacingError> {
        if !(target_fps > 0.0) {
            return Err(PacingError::InvalidTargetFps(target_fps));
        }
        Ok(Self {
            target_interval: 1.0 / target_fps,
            last_frame_time: None,
            frame_counter: 0,
            window_start: None,
            sample_window: SAMPLE_WINDOW_SECS,
            max_ticks_per_step: MAX_TICKS_PER_STEP,
        })
    }

    #[inline]
    pub fn target_interval(&self) -> f64 {
        self.target_interval
    }

    /// Decide whether the caller should step now. `now` is wall-clock seconds
    /// from any fixed origin, monotonically non-decreasing.
    pub fn poll(&mut self, now: f64) -> PacerDecision {
        // First observation seeds the timer, so the first real decision sees
        // delta = 0 and waits.
        let last = *self.last_frame_time.get_or_insert(now);
        self.window_start.get_or_insert(now);

        let delta = now - last;
        if delta < self.target_interval {
            return PacerDecision::Wait { hint: YIELD_HINT };
        }

        // Advance by the real elapsed time, not a fixed step, so motion speed
        // stays wall-clock-correct when the achieved rate drifts below
        // target. The clamp bounds the catch-up burst after a long stall.
        self.last_frame_time = Some(now);
        self.frame_counter += 1;
        let ticks = (delta / self.target_interval).round() as u32;
        PacerDecision::Ready {
            delta_ticks: ticks.clamp(1, self.max_ticks_per_step),
        }
    }

    /// Achieved-FPS sample once per window, if due. Diagnostic only; has no
    /// influence on pacing decisions.
    pub fn take_fps_sample(&mut self, now: f64) -> Option<f64> {
        let start = *self.window_start.get_or_insert(now);
        let elapsed = now - start;
        if elapsed < self.sample_window || elapsed <= 0.0 {
            return None;
        }
        let fps = f64::from(self.frame_counter) / elapsed;
        self.frame_counter = 0;
        self.window_start = Some(now);
        Some(fps)
    }
}
