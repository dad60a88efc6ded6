use crate::capture::{AbortSignal, Artifact, CaptureAdapter, PendingArtifact};
use crate::config::WheelConfig;
use crate::foundation::error::{WheelError, WheelResult};
use crate::host::FrameScheduler;
use crate::present::ResultPresenter;
use crate::render::backend::{FrameRGBA, WheelRenderer};
use crate::spin::plan::{SpinChoice, SpinPlan, SpinTuning};
use crate::wheel::geometry::winning_index;
use crate::wheel::segment::{Segment, build_segments};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Current wheel contents and position.
#[derive(Clone, Debug, Default)]
pub struct WheelState {
    segments: Vec<Segment>,
    rotation_degrees: f64,
    spinning: bool,
}

impl WheelState {
    /// Segments in draw order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Accumulated rotation; grows without bound across spins.
    pub fn rotation_degrees(&self) -> f64 {
        self.rotation_degrees
    }

    /// Whether a spin is running.
    pub fn is_spinning(&self) -> bool {
        self.spinning
    }
}

/// Returned by [`SpinEngine::spin`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpinStart {
    /// Rotation when the spin started.
    pub start_rotation_degrees: f64,
    /// Rotation that will be added by the end.
    pub target_rotation_degrees: f64,
    /// Spin length.
    pub duration_ms: f64,
}

/// Outcome of a finished spin.
#[derive(Clone, Debug, PartialEq)]
pub struct SpinResult {
    /// Index of the winning segment.
    pub winner_index: usize,
    /// Label of the winning segment.
    pub winner: String,
    /// Rotation the wheel stopped at.
    pub final_rotation_degrees: f64,
    /// Frames handed to the capture adapter.
    pub captured_frames: usize,
}

/// What one [`SpinEngine::on_frame`] step did.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameOutcome {
    /// Nothing running; the step was ignored.
    Idle,
    /// Frame drawn, another one requested.
    Running,
    /// The wheel stopped.
    Finished(SpinResult),
}

/// State of the recording of the last spin.
#[derive(Debug)]
pub enum ArtifactStatus {
    /// No recording is expected.
    None,
    /// Still being assembled.
    Pending,
    /// Assembled and handed to the presenter.
    Ready(Artifact),
    /// Assembly failed.
    Failed(WheelError),
    /// Assembly missed its deadline and was aborted. Always a [`WheelError::Timeout`].
    TimedOut(WheelError),
}

struct PendingDelivery {
    pending: PendingArtifact,
    deadline_ms: f64,
}

/// Collaborators a [`SpinEngine`] is wired to.
pub struct EngineParts {
    /// Draws the wheel.
    pub renderer: Box<dyn WheelRenderer>,
    /// Records the spin; `None` disables recording.
    pub capture: Option<Box<dyn CaptureAdapter>>,
    /// Receives winners and recordings.
    pub presenter: Box<dyn ResultPresenter>,
    /// Delivers frame steps.
    pub scheduler: Box<dyn FrameScheduler>,
}

/// Spin state machine: `Idle -> Spinning -> Idle`.
///
/// All transitions happen through `&mut self` calls on the host's thread. The only concurrent
/// work is artifact assembly inside the capture adapter, tied to the spin by an [`AbortSignal`].
pub struct SpinEngine {
    cfg: WheelConfig,
    tuning: SpinTuning,
    state: WheelState,
    renderer: Box<dyn WheelRenderer>,
    capture: Option<Box<dyn CaptureAdapter>>,
    presenter: Box<dyn ResultPresenter>,
    scheduler: Box<dyn FrameScheduler>,
    rng: StdRng,
    plan: Option<SpinPlan>,
    abort: AbortSignal,
    frame_index: u64,
    captured: usize,
    recording: bool,
    artifact: Option<PendingDelivery>,
}

impl SpinEngine {
    /// Build an idle engine with an empty wheel.
    pub fn new(cfg: WheelConfig, parts: EngineParts) -> WheelResult<Self> {
        cfg.validate()?;
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            tuning: SpinTuning::from_config(&cfg),
            cfg,
            state: WheelState::default(),
            renderer: parts.renderer,
            capture: parts.capture,
            presenter: parts.presenter,
            scheduler: parts.scheduler,
            rng,
            plan: None,
            abort: AbortSignal::new(),
            frame_index: 0,
            captured: 0,
            recording: false,
            artifact: None,
        })
    }

    /// Configuration the engine runs with.
    pub fn config(&self) -> &WheelConfig {
        &self.cfg
    }

    /// Wheel contents and position.
    pub fn state(&self) -> &WheelState {
        &self.state
    }

    /// The running spin, if any.
    pub fn plan(&self) -> Option<&SpinPlan> {
        self.plan.as_ref()
    }

    /// Pixels of the last drawn frame.
    pub fn snapshot(&self) -> FrameRGBA {
        self.renderer.snapshot()
    }

    /// Replace the wheel with segments built from `names`.
    pub fn set_names<S: AsRef<str>>(&mut self, names: &[S]) -> WheelResult<()> {
        self.ensure_idle("names cannot change while the wheel is spinning")?;
        let segments = build_segments(names, &self.cfg)?;
        self.set_segments(segments)
    }

    /// Replace the wheel with prepared segments and redraw it.
    ///
    /// Held to the same rules as [`build_segments`]: at least one segment, at most
    /// `max_segments`, no blank labels.
    pub fn set_segments(&mut self, segments: Vec<Segment>) -> WheelResult<()> {
        self.ensure_idle("segments cannot change while the wheel is spinning")?;
        if segments.is_empty() {
            return Err(WheelError::validation("at least one name is required"));
        }
        if let Some(i) = segments.iter().position(|s| s.label.trim().is_empty()) {
            return Err(WheelError::validation(format!("name #{} is blank", i + 1)));
        }
        if segments.len() > self.cfg.max_segments {
            return Err(WheelError::validation(format!(
                "maximum {} names allowed (got {})",
                self.cfg.max_segments,
                segments.len()
            )));
        }
        self.state.segments = segments;
        self.redraw()
    }

    /// Draw the wheel at its current rotation.
    pub fn redraw(&mut self) -> WheelResult<()> {
        self.renderer
            .render(&self.state.segments, self.state.rotation_degrees)
    }

    /// Pick the only name on a one-segment wheel, no spinning involved.
    pub fn resolve_single(&mut self) -> WheelResult<String> {
        self.ensure_idle("a spin is already running")?;
        let [only] = self.state.segments.as_slice() else {
            return Err(WheelError::precondition(format!(
                "resolve_single needs exactly one segment (got {})",
                self.state.segments.len()
            )));
        };
        let winner = only.label.clone();
        tracing::info!(winner = %winner, "single entry wins");
        self.presenter.show_winner(&winner);
        Ok(winner)
    }

    /// Start a spin with fresh random draws.
    ///
    /// Rejected with [`WheelError::Precondition`] while spinning or with fewer than two segments;
    /// a rejected request changes nothing.
    #[tracing::instrument(skip(self), fields(segments = self.state.segments.len()))]
    pub fn spin(&mut self, now_ms: f64) -> WheelResult<SpinStart> {
        self.check_can_spin()?;
        let choice = SpinChoice::random(&mut self.rng, self.state.segments.len(), &self.tuning);
        self.start(now_ms, choice)
    }

    /// Start a spin with caller-provided draws.
    #[tracing::instrument(skip(self), fields(segments = self.state.segments.len()))]
    pub fn spin_with(&mut self, now_ms: f64, choice: SpinChoice) -> WheelResult<SpinStart> {
        self.check_can_spin()?;
        self.start(now_ms, choice)
    }

    fn check_can_spin(&self) -> WheelResult<()> {
        self.ensure_idle("a spin is already running")?;
        if self.state.segments.len() < 2 {
            return Err(WheelError::precondition(format!(
                "spinning needs at least 2 segments (got {})",
                self.state.segments.len()
            )));
        }
        Ok(())
    }

    fn start(&mut self, now_ms: f64, choice: SpinChoice) -> WheelResult<SpinStart> {
        let n = self.state.segments.len();
        let plan = SpinPlan::from_choice(
            choice,
            n,
            self.state.rotation_degrees,
            now_ms,
            &self.tuning,
        )?;

        if self.artifact.take().is_some() {
            self.abort.abort();
            tracing::debug!("previous recording superseded");
        }
        self.abort = AbortSignal::new();
        self.frame_index = 0;
        self.captured = 0;
        self.recording = false;

        if let Some(capture) = self.capture.as_mut() {
            let canvas = self.renderer.canvas();
            match capture.begin(canvas.width, canvas.height, self.abort.clone()) {
                Ok(()) => self.recording = true,
                Err(e) => tracing::warn!(error = %e, "recording disabled for this spin"),
            }
        }

        tracing::debug!(
            target = plan.target_segment_index,
            delta = plan.target_rotation_degrees,
            duration_ms = plan.duration_ms,
            "spin planned"
        );
        let start = SpinStart {
            start_rotation_degrees: plan.start_rotation_degrees,
            target_rotation_degrees: plan.target_rotation_degrees,
            duration_ms: plan.duration_ms,
        };
        self.plan = Some(plan);
        self.state.spinning = true;
        self.scheduler.request_frame();
        Ok(start)
    }

    /// Advance the running spin to `now_ms`.
    ///
    /// Steps that arrive while idle or after a cancel are ignored. A render failure cancels the
    /// spin and is returned.
    pub fn on_frame(&mut self, now_ms: f64) -> WheelResult<FrameOutcome> {
        if !self.state.spinning || self.abort.is_aborted() {
            return Ok(FrameOutcome::Idle);
        }
        let Some(plan) = self.plan else {
            return Ok(FrameOutcome::Idle);
        };

        let progress = plan.progress(now_ms);
        let rotation = if progress >= 1.0 {
            plan.final_rotation()
        } else {
            plan.rotation_at(self.tuning.ease, now_ms)
                .max(self.state.rotation_degrees)
        };
        self.state.rotation_degrees = rotation;

        if let Err(e) = self.renderer.render(&self.state.segments, rotation) {
            tracing::error!(error = %e, "frame render failed, cancelling spin");
            self.cancel();
            return Err(e);
        }

        self.capture_frame();

        if progress < 1.0 {
            self.scheduler.request_frame();
            return Ok(FrameOutcome::Running);
        }
        Ok(FrameOutcome::Finished(self.finish(plan, now_ms)))
    }

    fn capture_frame(&mut self) {
        let every = u64::from(self.cfg.capture_every.max(1));
        let due = self.frame_index.is_multiple_of(every);
        self.frame_index += 1;
        if !self.recording || !due {
            return;
        }
        let Some(capture) = self.capture.as_mut() else {
            return;
        };
        let frame = self.renderer.snapshot();
        match capture.add_frame(&frame, self.cfg.frame_delay_ms) {
            Ok(()) => self.captured += 1,
            Err(e) => tracing::warn!(error = %e, frame = self.frame_index, "frame capture failed"),
        }
    }

    fn finish(&mut self, plan: SpinPlan, now_ms: f64) -> SpinResult {
        self.state.spinning = false;
        self.plan = None;

        let n = self.state.segments.len();
        let rotation = self.state.rotation_degrees;
        let winner_index = winning_index(rotation, n, self.tuning.pointer_angle_degrees)
            .unwrap_or(plan.target_segment_index);
        debug_assert_eq!(winner_index, plan.target_segment_index);
        let winner = self
            .state
            .segments
            .get(winner_index)
            .map(|s| s.label.clone())
            .unwrap_or_default();

        tracing::info!(winner = %winner, index = winner_index, rotation, "spin finished");
        self.presenter.show_winner(&winner);

        if self.recording {
            self.recording = false;
            if let Some(capture) = self.capture.as_mut() {
                match capture.render() {
                    Ok(pending) => {
                        self.artifact = Some(PendingDelivery {
                            pending,
                            deadline_ms: now_ms + self.cfg.artifact_timeout_ms,
                        });
                    }
                    Err(e) => tracing::warn!(error = %e, "recording could not be assembled"),
                }
            }
        }

        SpinResult {
            winner_index,
            winner,
            final_rotation_degrees: rotation,
            captured_frames: self.captured,
        }
    }

    /// Check on the recording of the last spin.
    ///
    /// A finished recording is handed to the presenter exactly once. Past the deadline the
    /// adapter is aborted and the recording dropped.
    pub fn poll_artifact(&mut self, now_ms: f64) -> ArtifactStatus {
        let Some(delivery) = self.artifact.as_mut() else {
            return ArtifactStatus::None;
        };
        match delivery.pending.try_take() {
            Some(Ok(artifact)) => {
                self.artifact = None;
                tracing::info!(
                    bytes = artifact.bytes.len(),
                    frames = artifact.frame_count,
                    "recording ready"
                );
                self.presenter.show_artifact(&artifact);
                ArtifactStatus::Ready(artifact)
            }
            Some(Err(e)) => {
                self.artifact = None;
                tracing::warn!(error = %e, "recording failed");
                ArtifactStatus::Failed(e)
            }
            None if now_ms >= delivery.deadline_ms => {
                self.artifact = None;
                let err = WheelError::timeout(format!(
                    "recording not ready after {} ms",
                    self.cfg.artifact_timeout_ms
                ));
                tracing::warn!(error = %err, "aborting recording");
                self.abort.abort();
                if let Some(capture) = self.capture.as_mut() {
                    capture.abort();
                }
                ArtifactStatus::TimedOut(err)
            }
            None => ArtifactStatus::Pending,
        }
    }

    /// Stop everything: the running spin (no winner), the recording, any pending artifact.
    ///
    /// The wheel stays at its last drawn rotation.
    #[tracing::instrument(skip(self))]
    pub fn cancel(&mut self) {
        if self.state.spinning {
            self.scheduler.cancel_frame();
            self.state.spinning = false;
            self.plan = None;
            tracing::info!(rotation = self.state.rotation_degrees, "spin cancelled");
        }
        self.abort.abort();
        if self.recording || self.artifact.is_some() {
            if let Some(capture) = self.capture.as_mut() {
                capture.abort();
            }
        }
        self.recording = false;
        self.artifact = None;
    }

    /// Cancel, then clear the wheel back to an empty, unrotated state.
    pub fn reset(&mut self) -> WheelResult<()> {
        self.cancel();
        self.state.segments.clear();
        self.state.rotation_degrees = 0.0;
        self.redraw()
    }

    fn ensure_idle(&self, msg: &str) -> WheelResult<()> {
        if self.state.spinning {
            return Err(WheelError::precondition(msg));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/spin/engine.rs"]
mod tests;
