//! Host integration: frame scheduling and a headless driver.
//!
//! The engine never owns a clock. It asks a [`FrameScheduler`] for "one more frame" and the host
//! answers by calling [`SpinEngine::on_frame`] with a timestamp. [`run_spin`] plays the host's
//! part without a display, either as fast as possible on a simulated clock or paced in real
//! time.

use crate::capture::Artifact;
use crate::foundation::error::{WheelError, WheelResult};
use crate::spin::engine::{ArtifactStatus, FrameOutcome, SpinEngine, SpinResult};
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Host-side frame request contract.
pub trait FrameScheduler {
    /// Ask for one `on_frame` call at the host's next opportunity.
    fn request_frame(&mut self);

    /// Withdraw an outstanding request.
    fn cancel_frame(&mut self);
}

#[derive(Debug, Default)]
struct ManualState {
    pending: Cell<bool>,
    requests: Cell<u64>,
}

/// Scheduler that just records the request. Clones share state.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    state: Rc<ManualState>,
}

impl ManualScheduler {
    /// Scheduler with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a frame is requested and not yet taken or cancelled.
    pub fn is_pending(&self) -> bool {
        self.state.pending.get()
    }

    /// Consume the outstanding request, returning whether there was one.
    pub fn take(&self) -> bool {
        self.state.pending.replace(false)
    }

    /// Total requests seen.
    pub fn requests(&self) -> u64 {
        self.state.requests.get()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) {
        self.state.pending.set(true);
        self.state.requests.set(self.state.requests.get() + 1);
    }

    fn cancel_frame(&mut self) {
        self.state.pending.set(false);
    }
}

/// Time source for [`run_spin`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DriveClock {
    /// Advance timestamps by the frame interval without sleeping.
    #[default]
    Simulated,
    /// Sleep between frames and use wall-clock timestamps.
    Realtime,
}

/// Options for [`run_spin`].
#[derive(Clone, Copy, Debug)]
pub struct DriveOpts {
    /// Time source.
    pub clock: DriveClock,
    /// Interval between frames.
    pub frame_interval_ms: f64,
    /// Sleep between artifact polls.
    pub poll_interval: Duration,
}

impl Default for DriveOpts {
    fn default() -> Self {
        Self {
            clock: DriveClock::Simulated,
            frame_interval_ms: 1000.0 / 60.0,
            poll_interval: Duration::from_millis(5),
        }
    }
}

/// What a headless spin produced.
#[derive(Debug)]
pub struct SpinReport {
    /// Winner and final rotation.
    pub result: SpinResult,
    /// Frames stepped through, including the last one.
    pub frames: u64,
    /// The recording, when one was assembled in time.
    pub artifact: Option<Artifact>,
}

/// Drive one full spin: start it, feed frames until the wheel stops, then wait for the artifact.
///
/// `scheduler` must be a handle to the scheduler the engine was built with.
pub fn run_spin(
    engine: &mut SpinEngine,
    scheduler: &ManualScheduler,
    opts: DriveOpts,
) -> WheelResult<SpinReport> {
    if !opts.frame_interval_ms.is_finite() || opts.frame_interval_ms <= 0.0 {
        return Err(WheelError::validation("frame interval must be finite and > 0"));
    }

    let wall = Instant::now();
    let mut now_ms = 0.0;
    engine.spin(now_ms)?;

    let mut frames = 0u64;
    let result = loop {
        if !scheduler.take() {
            return Err(WheelError::precondition("spin stopped without a winner"));
        }
        now_ms = match opts.clock {
            DriveClock::Simulated => now_ms + opts.frame_interval_ms,
            DriveClock::Realtime => {
                std::thread::sleep(Duration::from_secs_f64(opts.frame_interval_ms / 1000.0));
                wall.elapsed().as_secs_f64() * 1000.0
            }
        };
        frames += 1;
        match engine.on_frame(now_ms)? {
            FrameOutcome::Running => {}
            FrameOutcome::Finished(result) => break result,
            FrameOutcome::Idle => {
                return Err(WheelError::precondition("spin stopped without a winner"));
            }
        }
    };

    // Assembly runs on real threads, so its deadline is measured on the wall clock from here.
    let finished = Instant::now();
    let artifact = loop {
        let t = now_ms + finished.elapsed().as_secs_f64() * 1000.0;
        match engine.poll_artifact(t) {
            ArtifactStatus::Pending => std::thread::sleep(opts.poll_interval),
            ArtifactStatus::Ready(a) => break Some(a),
            ArtifactStatus::None | ArtifactStatus::Failed(_) | ArtifactStatus::TimedOut(_) => {
                break None;
            }
        }
    };

    Ok(SpinReport {
        result,
        frames,
        artifact,
    })
}

#[cfg(test)]
#[path = "../tests/unit/host.rs"]
mod tests;
