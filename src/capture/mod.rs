//! Frame capture and artifact export.
//!
//! The engine hands sub-sampled frames to a [`CaptureAdapter`] while the wheel turns and asks it
//! to assemble an [`Artifact`] once the winner is known. Assembly may run elsewhere; the result
//! comes back through a [`PendingArtifact`] that the engine polls against a deadline.

/// Animated GIF export via the `image` crate.
pub mod gif;
/// In-memory capture for tests and embedding.
pub mod memory;

use crate::foundation::error::{WheelError, WheelResult};
use crate::render::backend::FrameRGBA;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

/// File name suggested for exported spins.
pub const DEFAULT_ARTIFACT_NAME: &str = "spin-result.gif";

/// Shared cancellation flag for one spin.
///
/// Cloned into every continuation belonging to the spin (frame steps, encoder workers). Once
/// raised it stays raised; a new spin gets a new signal.
#[derive(Clone, Debug, Default)]
pub struct AbortSignal(Arc<AtomicBool>);

impl AbortSignal {
    /// Fresh, un-raised signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal.
    pub fn abort(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether the signal was raised.
    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// An exported, shareable recording of a spin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    /// Encoded bytes.
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`.
    pub mime: &'static str,
    /// Number of frames in the recording.
    pub frame_count: usize,
    /// Suggested download file name.
    pub suggested_file_name: String,
}

/// Result of an artifact assembly that may still be running.
#[derive(Debug)]
pub struct PendingArtifact {
    state: PendingState,
}

#[derive(Debug)]
enum PendingState {
    Resolved(Option<WheelResult<Artifact>>),
    Channel(Receiver<WheelResult<Artifact>>),
    Taken,
}

impl PendingArtifact {
    /// Already finished assembly.
    pub fn resolved(result: WheelResult<Artifact>) -> Self {
        Self {
            state: PendingState::Resolved(Some(result)),
        }
    }

    /// Assembly running on another thread that will send exactly one result.
    pub fn from_channel(rx: Receiver<WheelResult<Artifact>>) -> Self {
        Self {
            state: PendingState::Channel(rx),
        }
    }

    /// Take the result if it is available, without blocking.
    ///
    /// Returns `None` while assembly is still running and after the result was taken.
    pub fn try_take(&mut self) -> Option<WheelResult<Artifact>> {
        match &mut self.state {
            PendingState::Resolved(slot) => {
                let out = slot.take();
                self.state = PendingState::Taken;
                out
            }
            PendingState::Channel(rx) => match rx.try_recv() {
                Ok(res) => {
                    self.state = PendingState::Taken;
                    Some(res)
                }
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => {
                    self.state = PendingState::Taken;
                    Some(Err(WheelError::capture(
                        "artifact worker exited without a result",
                    )))
                }
            },
            PendingState::Taken => None,
        }
    }

    /// Block up to `timeout` for the result.
    pub fn wait_timeout(&mut self, timeout: Duration) -> Option<WheelResult<Artifact>> {
        if let PendingState::Channel(rx) = &self.state {
            return match rx.recv_timeout(timeout) {
                Ok(res) => {
                    self.state = PendingState::Taken;
                    Some(res)
                }
                Err(std::sync::mpsc::RecvTimeoutError::Timeout) => None,
                Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                    self.state = PendingState::Taken;
                    Some(Err(WheelError::capture(
                        "artifact worker exited without a result",
                    )))
                }
            };
        }
        self.try_take()
    }
}

/// Capture/export contract.
///
/// All failures are best-effort from the engine's point of view: they are logged and cost the
/// artifact, never the spin.
pub trait CaptureAdapter {
    /// Start a new recording of `width` x `height` frames tied to `abort`.
    fn begin(&mut self, width: u32, height: u32, abort: AbortSignal) -> WheelResult<()>;

    /// Append a frame shown for `delay_ms`.
    fn add_frame(&mut self, frame: &FrameRGBA, delay_ms: u32) -> WheelResult<()>;

    /// Assemble the recorded frames. Consumes the recording.
    fn render(&mut self) -> WheelResult<PendingArtifact>;

    /// Drop the recording and stop any assembly in flight.
    fn abort(&mut self);
}

#[cfg(test)]
#[path = "../../tests/unit/capture/pending.rs"]
mod tests;
