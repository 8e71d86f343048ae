//! Frame scheduler: a restartable, self-re-arming render loop with cancellation.
//!
//! The host calls [`FrameScheduler::run_frame`] on every display refresh. At
//! most one invocation is pending at any time; running it re-arms the next one
//! unless the loop was cancelled in the meantime. Animation code only sees
//! accumulated elapsed time and a clamped delta, never a frame count, so
//! perceived speed does not depend on the refresh rate.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::params::REFERENCE_FPS;

/// Timing handed to each frame callback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Accumulated animation time since start (seconds)
    pub elapsed: f32,
    /// Time since the previous frame, clamped (seconds)
    pub delta: f32,
    /// Frames run since start (diagnostics only)
    pub frame: u64,
}

impl FrameTime {
    /// Delta expressed in 60 Hz reference frames
    pub fn reference_frames(&self) -> f32 {
        self.delta * REFERENCE_FPS
    }
}

/// Shared cancellation flag for a running loop
///
/// Clones observe the same flag, so code running inside a frame can stop the
/// loop that is running it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

#[derive(Debug, Clone, Copy)]
enum State {
    Stopped,
    Running { last: Instant, pending: bool },
}

/// Drives one renderer's frame callback
#[derive(Debug)]
pub struct FrameScheduler {
    state: State,
    token: CancelToken,
    max_delta: f32,
    elapsed: f32,
    frame: u64,
    fps: f32,
    fps_frames: u64,
    fps_window_start: Option<Instant>,
}

const FPS_WINDOW: Duration = Duration::from_millis(500);

impl FrameScheduler {
    pub fn new(max_delta: f32) -> Self {
        Self {
            state: State::Stopped,
            token: CancelToken::default(),
            max_delta,
            elapsed: 0.0,
            frame: 0,
            fps: 0.0,
            fps_frames: 0,
            fps_window_start: None,
        }
    }

    /// Arm the first invocation and reset the clock
    ///
    /// Returns the token that cancels this run. Starting an already-running
    /// scheduler cancels the previous run first.
    pub fn start(&mut self, now: Instant) -> CancelToken {
        self.token.cancel();
        self.token = CancelToken::default();
        self.state = State::Running {
            last: now,
            pending: true,
        };
        self.elapsed = 0.0;
        self.frame = 0;
        self.fps = 0.0;
        self.fps_frames = 0;
        self.fps_window_start = Some(now);
        self.token.clone()
    }

    /// Cancel the pending invocation
    pub fn stop(&mut self) {
        self.token.cancel();
        self.state = State::Stopped;
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, State::Running { .. }) && !self.token.is_cancelled()
    }

    /// True while an invocation is armed and not cancelled
    pub fn has_pending(&self) -> bool {
        matches!(self.state, State::Running { pending: true, .. }) && !self.token.is_cancelled()
    }

    /// Run the pending invocation, if any, then re-arm
    ///
    /// Returns whether the callback ran.
    pub fn run_frame<F>(&mut self, now: Instant, callback: F) -> bool
    where
        F: FnOnce(&FrameTime),
    {
        if self.token.is_cancelled() {
            self.state = State::Stopped;
            return false;
        }
        let State::Running {
            last,
            pending: true,
        } = self.state
        else {
            return false;
        };

        // Consume the pending slot before running so a re-entrant call is a no-op
        self.state = State::Running {
            last: now,
            pending: false,
        };

        let delta = now
            .saturating_duration_since(last)
            .as_secs_f32()
            .min(self.max_delta);
        self.elapsed += delta;
        self.frame += 1;

        let frame = FrameTime {
            elapsed: self.elapsed,
            delta,
            frame: self.frame,
        };
        callback(&frame);

        if self.token.is_cancelled() {
            self.state = State::Stopped;
        } else {
            self.state = State::Running {
                last: now,
                pending: true,
            };
        }

        self.update_fps(now);
        true
    }

    fn update_fps(&mut self, now: Instant) {
        self.fps_frames += 1;
        let Some(window_start) = self.fps_window_start else {
            self.fps_window_start = Some(now);
            return;
        };
        let span = now.saturating_duration_since(window_start);
        if span >= FPS_WINDOW {
            self.fps = self.fps_frames as f32 / span.as_secs_f32();
            self.fps_frames = 0;
            self.fps_window_start = Some(now);
        }
    }

    /// Accumulated animation time (seconds)
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Frames per second over the last measurement window
    pub fn fps(&self) -> f32 {
        self.fps
    }
}
