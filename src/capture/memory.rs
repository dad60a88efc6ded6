use crate::capture::{AbortSignal, Artifact, CaptureAdapter, DEFAULT_ARTIFACT_NAME, PendingArtifact};
use crate::foundation::error::{WheelError, WheelResult};
use crate::render::backend::FrameRGBA;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc;

/// How [`InMemoryCapture::render`] behaves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MemoryRenderMode {
    /// Resolve immediately with the recorded frames.
    #[default]
    Immediate,
    /// Return a pending artifact that never resolves.
    Never,
    /// Fail to start assembly.
    Fail,
}

/// Everything an [`InMemoryCapture`] has seen.
#[derive(Clone, Debug, Default)]
pub struct MemoryLog {
    /// Number of `begin` calls.
    pub sessions: usize,
    /// Last `begin` dimensions.
    pub size: Option<(u32, u32)>,
    /// Frames of the current or last recording with their delays.
    pub frames: Vec<(FrameRGBA, u32)>,
    /// Number of `render` calls.
    pub renders: usize,
    /// Number of `abort` calls.
    pub aborts: usize,
    /// Signal of the current recording.
    pub abort_signal: Option<AbortSignal>,
}

/// Capture adapter that keeps frames in memory and hands them back unencoded.
///
/// Clones share the same log, so a test can keep one handle while the engine owns another.
#[derive(Clone, Debug, Default)]
pub struct InMemoryCapture {
    log: Rc<RefCell<MemoryLog>>,
    mode: MemoryRenderMode,
    fail_frames: bool,
    parked: Rc<RefCell<Vec<mpsc::Sender<WheelResult<Artifact>>>>>,
}

impl InMemoryCapture {
    /// Capture that resolves immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Change how `render` behaves.
    pub fn with_render_mode(mut self, mode: MemoryRenderMode) -> Self {
        self.mode = mode;
        self
    }

    /// Make every `add_frame` fail.
    pub fn failing_frames(mut self) -> Self {
        self.fail_frames = true;
        self
    }

    /// Snapshot of the shared log.
    pub fn log(&self) -> MemoryLog {
        self.log.borrow().clone()
    }
}

impl CaptureAdapter for InMemoryCapture {
    fn begin(&mut self, width: u32, height: u32, abort: AbortSignal) -> WheelResult<()> {
        let mut log = self.log.borrow_mut();
        log.sessions += 1;
        log.size = Some((width, height));
        log.frames.clear();
        log.abort_signal = Some(abort);
        Ok(())
    }

    fn add_frame(&mut self, frame: &FrameRGBA, delay_ms: u32) -> WheelResult<()> {
        if self.fail_frames {
            return Err(WheelError::capture("in-memory capture rejects frames"));
        }
        self.log.borrow_mut().frames.push((frame.clone(), delay_ms));
        Ok(())
    }

    fn render(&mut self) -> WheelResult<PendingArtifact> {
        let mut log = self.log.borrow_mut();
        log.renders += 1;
        match self.mode {
            MemoryRenderMode::Immediate => {
                let bytes = log
                    .frames
                    .iter()
                    .flat_map(|(f, _)| f.data.iter().copied())
                    .collect();
                Ok(PendingArtifact::resolved(Ok(Artifact {
                    bytes,
                    mime: "application/octet-stream",
                    frame_count: log.frames.len(),
                    suggested_file_name: DEFAULT_ARTIFACT_NAME.to_owned(),
                })))
            }
            MemoryRenderMode::Never => {
                // A live sender keeps the receiver reporting "still running".
                let (tx, rx) = mpsc::channel();
                self.parked.borrow_mut().push(tx);
                Ok(PendingArtifact::from_channel(rx))
            }
            MemoryRenderMode::Fail => Err(WheelError::capture("in-memory render failure")),
        }
    }

    fn abort(&mut self) {
        let mut log = self.log.borrow_mut();
        log.aborts += 1;
        if let Some(sig) = &log.abort_signal {
            sig.abort();
        }
    }
}
