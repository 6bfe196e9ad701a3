use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use crate::config;

/// Millisecond time source for frame diagnostics.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Monotonic wall clock.
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-advanced clock. Clones share the same time.
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// FPS accumulator and frame timestamps. Diagnostic only; the simulation
/// never reads these.
#[derive(Clone, Debug, Default)]
pub struct FrameTiming {
    last_frame_ms: f64,
    fps_window_start_ms: f64,
    frames_in_window: u32,
    fps: u32,
    total_frames: u64,
    last_frame_duration_ms: f64,
}

impl FrameTiming {
    /// Start a new measurement window at `now`.
    pub fn reset(&mut self, now: f64) {
        self.last_frame_ms = now;
        self.fps_window_start_ms = now;
        self.frames_in_window = 0;
    }

    /// Count one frame; snapshots FPS once a full window has elapsed.
    pub fn begin_frame(&mut self, now: f64) {
        self.frames_in_window += 1;
        self.total_frames += 1;
        if now - self.fps_window_start_ms >= config::FPS_WINDOW_MS {
            self.fps = self.frames_in_window;
            self.frames_in_window = 0;
            self.fps_window_start_ms = now;
        }
    }

    pub fn end_frame(&mut self, now: f64) {
        self.last_frame_duration_ms = now - self.last_frame_ms;
        self.last_frame_ms = now;
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Time between the two most recent frame ends.
    pub fn last_frame_duration_ms(&self) -> f64 {
        self.last_frame_duration_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_snapshots_after_one_second_window() {
        let clock = ManualClock::new();
        let mut timing = FrameTiming::default();
        timing.reset(clock.now_ms());

        for _ in 0..59 {
            clock.advance(1000.0 / 60.0);
            timing.begin_frame(clock.now_ms());
            timing.end_frame(clock.now_ms());
        }
        assert_eq!(timing.fps(), 0);

        clock.advance(1000.0 / 60.0 + 1.0);
        timing.begin_frame(clock.now_ms());
        assert_eq!(timing.fps(), 60);
        assert_eq!(timing.total_frames(), 60);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let other = clock.clone();
        clock.advance(25.0);
        assert_eq!(other.now_ms(), 25.0);
    }
}
