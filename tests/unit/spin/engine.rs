use super::*;
use crate::capture::memory::{InMemoryCapture, MemoryRenderMode};
use crate::foundation::core::Canvas;
use crate::host::ManualScheduler;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Default)]
struct StubRenderer {
    rotations: Rc<RefCell<Vec<f64>>>,
    fail: Rc<RefCell<bool>>,
}

impl WheelRenderer for StubRenderer {
    fn canvas(&self) -> Canvas {
        Canvas {
            width: 4,
            height: 4,
        }
    }

    fn render(&mut self, _segments: &[Segment], rotation_degrees: f64) -> WheelResult<()> {
        if *self.fail.borrow() {
            return Err(WheelError::render("stub failure"));
        }
        self.rotations.borrow_mut().push(rotation_degrees);
        Ok(())
    }

    fn snapshot(&self) -> FrameRGBA {
        FrameRGBA {
            width: 4,
            height: 4,
            data: vec![255; 64],
            premultiplied: true,
        }
    }
}

#[derive(Clone, Default)]
struct Recorder {
    winners: Rc<RefCell<Vec<String>>>,
    artifacts: Rc<RefCell<Vec<Artifact>>>,
}

impl ResultPresenter for Recorder {
    fn show_winner(&mut self, winner: &str) {
        self.winners.borrow_mut().push(winner.to_owned());
    }

    fn show_artifact(&mut self, artifact: &Artifact) {
        self.artifacts.borrow_mut().push(artifact.clone());
    }
}

struct Rig {
    engine: SpinEngine,
    renderer: StubRenderer,
    capture: InMemoryCapture,
    presenter: Recorder,
    scheduler: ManualScheduler,
}

fn rig_with(capture: InMemoryCapture) -> Rig {
    let cfg = WheelConfig {
        seed: Some(42),
        ..WheelConfig::default()
    };
    rig_from(cfg, capture)
}

fn rig_from(cfg: WheelConfig, capture: InMemoryCapture) -> Rig {
    let renderer = StubRenderer::default();
    let presenter = Recorder::default();
    let scheduler = ManualScheduler::new();
    let engine = SpinEngine::new(
        cfg,
        EngineParts {
            renderer: Box::new(renderer.clone()),
            capture: Some(Box::new(capture.clone())),
            presenter: Box::new(presenter.clone()),
            scheduler: Box::new(scheduler.clone()),
        },
    )
    .unwrap();
    Rig {
        engine,
        renderer,
        capture,
        presenter,
        scheduler,
    }
}

fn rig() -> Rig {
    rig_with(InMemoryCapture::new())
}

fn bob_choice() -> SpinChoice {
    SpinChoice {
        target_segment_index: 1,
        jitter_degrees: 30.0,
        duration_ms: 1000.0,
    }
}

/// Step frames every 10 ms until the spin ends; returns the result and frame count.
fn run_to_end(rig: &mut Rig, mut now: f64) -> (SpinResult, u32) {
    let mut frames = 0;
    loop {
        assert!(rig.scheduler.take(), "engine should have requested a frame");
        now += 10.0;
        frames += 1;
        match rig.engine.on_frame(now).unwrap() {
            FrameOutcome::Running => {}
            FrameOutcome::Finished(r) => return (r, frames),
            FrameOutcome::Idle => panic!("spin went idle"),
        }
    }
}

#[test]
fn worked_example_picks_bob() {
    let mut r = rig();
    r.engine.set_names(&["Alice", "Bob", "Carol"]).unwrap();
    let start = r.engine.spin_with(0.0, bob_choice()).unwrap();
    assert!((start.target_rotation_degrees - 1890.0).abs() < 1e-9);
    assert!(r.engine.state().is_spinning());

    let (res, frames) = run_to_end(&mut r, 0.0);
    assert_eq!(frames, 100);
    assert_eq!(res.winner, "Bob");
    assert_eq!(res.winner_index, 1);
    assert!((res.final_rotation_degrees - 1890.0).abs() < 1e-9);
    assert_eq!(*r.presenter.winners.borrow(), vec!["Bob".to_owned()]);
    assert!(!r.engine.state().is_spinning());
    assert!(!r.scheduler.is_pending());
}

#[test]
fn spin_while_spinning_is_rejected() {
    let mut r = rig();
    r.engine.set_names(&["A", "B"]).unwrap();
    r.engine.spin_with(0.0, bob_choice()).unwrap();
    let plan = *r.engine.plan().unwrap();
    let err = r.engine.spin(5.0).unwrap_err();
    assert!(matches!(err, WheelError::Precondition(_)));
    assert_eq!(*r.engine.plan().unwrap(), plan);
    assert_eq!(r.capture.log().sessions, 1);
}

#[test]
fn spin_needs_two_segments() {
    let mut r = rig();
    assert!(matches!(r.engine.spin(0.0), Err(WheelError::Precondition(_))));
    r.engine.set_names(&["Solo"]).unwrap();
    assert!(matches!(r.engine.spin(0.0), Err(WheelError::Precondition(_))));
    assert!(!r.scheduler.is_pending());

    assert_eq!(r.engine.resolve_single().unwrap(), "Solo");
    assert_eq!(*r.presenter.winners.borrow(), vec!["Solo".to_owned()]);
}

#[test]
fn resolve_single_rejects_other_sizes() {
    let mut r = rig();
    r.engine.set_names(&["A", "B"]).unwrap();
    assert!(matches!(
        r.engine.resolve_single(),
        Err(WheelError::Precondition(_))
    ));
}

#[test]
fn cancel_mid_spin_reports_no_winner() {
    let mut r = rig();
    r.engine.set_names(&["A", "B", "C"]).unwrap();
    r.engine.spin(0.0).unwrap();
    assert!(r.scheduler.take());
    assert_eq!(r.engine.on_frame(10.0).unwrap(), FrameOutcome::Running);

    r.engine.cancel();
    assert!(!r.scheduler.is_pending());
    assert!(!r.engine.state().is_spinning());
    assert!(r.engine.plan().is_none());
    assert_eq!(r.capture.log().aborts, 1);

    // A late step from the host is a no-op.
    let drawn = r.renderer.rotations.borrow().len();
    assert_eq!(r.engine.on_frame(5000.0).unwrap(), FrameOutcome::Idle);
    assert_eq!(r.renderer.rotations.borrow().len(), drawn);
    assert!(r.presenter.winners.borrow().is_empty());
    assert!(matches!(r.engine.poll_artifact(6000.0), ArtifactStatus::None));
}

#[test]
fn chained_spins_still_land_on_target() {
    let mut r = rig();
    r.engine
        .set_names(&["A", "B", "C", "D", "E", "F", "G"])
        .unwrap();
    let mut now = 0.0;
    for target in [3usize, 0, 6, 6, 2] {
        let choice = SpinChoice {
            target_segment_index: target,
            jitter_degrees: 11.0,
            duration_ms: 500.0,
        };
        let before = r.engine.state().rotation_degrees();
        let start = r.engine.spin_with(now, choice).unwrap();
        assert_eq!(start.start_rotation_degrees, before);
        assert!(start.target_rotation_degrees >= 1800.0);
        let (res, frames) = run_to_end(&mut r, now);
        now += f64::from(frames) * 10.0;
        assert_eq!(res.winner_index, target);
        let _ = r.engine.poll_artifact(now);
    }
    assert_eq!(r.presenter.winners.borrow().len(), 5);
}

#[test]
fn rotation_never_goes_backwards() {
    let mut r = rig();
    r.engine.set_names(&["A", "B"]).unwrap();
    r.engine.spin_with(0.0, bob_choice_for(2)).unwrap();
    r.scheduler.take();
    r.engine.on_frame(500.0).unwrap();
    let ahead = r.engine.state().rotation_degrees();
    r.scheduler.take();
    r.engine.on_frame(100.0).unwrap();
    assert_eq!(r.engine.state().rotation_degrees(), ahead);
}

fn bob_choice_for(n: usize) -> SpinChoice {
    SpinChoice {
        target_segment_index: 1 % n,
        jitter_degrees: 0.0,
        duration_ms: 1000.0,
    }
}

#[test]
fn every_second_frame_is_captured() {
    let mut r = rig();
    r.engine.set_names(&["A", "B", "C"]).unwrap();
    r.engine.spin_with(0.0, bob_choice()).unwrap();
    let (res, frames) = run_to_end(&mut r, 0.0);
    assert_eq!(frames, 100);
    assert_eq!(res.captured_frames, 50);

    let log = r.capture.log();
    assert_eq!(log.size, Some((4, 4)));
    assert_eq!(log.frames.len(), 50);
    assert!(log.frames.iter().all(|(_, delay)| *delay == 50));
    assert_eq!(log.renders, 1);
}

#[test]
fn capture_failures_do_not_stop_the_spin() {
    let mut r = rig_with(InMemoryCapture::new().failing_frames());
    r.engine.set_names(&["A", "B", "C"]).unwrap();
    r.engine.spin_with(0.0, bob_choice()).unwrap();
    let (res, _) = run_to_end(&mut r, 0.0);
    assert_eq!(res.winner, "B");
    assert_eq!(res.captured_frames, 0);
}

#[test]
fn failed_assembly_keeps_the_winner() {
    let mut r = rig_with(InMemoryCapture::new().with_render_mode(MemoryRenderMode::Fail));
    r.engine.set_names(&["A", "B", "C"]).unwrap();
    r.engine.spin_with(0.0, bob_choice()).unwrap();
    let (res, _) = run_to_end(&mut r, 0.0);
    assert_eq!(res.winner, "B");
    assert!(matches!(r.engine.poll_artifact(2000.0), ArtifactStatus::None));
}

#[test]
fn artifact_is_delivered_once() {
    let mut r = rig();
    r.engine.set_names(&["A", "B", "C"]).unwrap();
    r.engine.spin_with(0.0, bob_choice()).unwrap();
    run_to_end(&mut r, 0.0);

    match r.engine.poll_artifact(1000.0) {
        ArtifactStatus::Ready(a) => assert_eq!(a.frame_count, 50),
        other => panic!("expected ready artifact, got {other:?}"),
    }
    assert!(matches!(r.engine.poll_artifact(1001.0), ArtifactStatus::None));
    assert_eq!(r.presenter.artifacts.borrow().len(), 1);
}

#[test]
fn artifact_timeout_aborts_capture() {
    let mut r = rig_with(InMemoryCapture::new().with_render_mode(MemoryRenderMode::Never));
    r.engine.set_names(&["A", "B", "C"]).unwrap();
    r.engine.spin_with(0.0, bob_choice()).unwrap();
    let (res, _) = run_to_end(&mut r, 0.0);
    assert_eq!(res.winner, "B");

    assert!(matches!(r.engine.poll_artifact(1000.0), ArtifactStatus::Pending));
    assert!(matches!(
        r.engine.poll_artifact(1000.0 + 29_999.0),
        ArtifactStatus::Pending
    ));
    match r.engine.poll_artifact(1000.0 + 30_000.0) {
        ArtifactStatus::TimedOut(err) => {
            assert!(matches!(err, WheelError::Timeout(_)));
            assert!(err.is_artifact_only());
        }
        other => panic!("expected timeout, got {other:?}"),
    }
    assert!(matches!(r.engine.poll_artifact(40_000.0), ArtifactStatus::None));
    let log = r.capture.log();
    assert_eq!(log.aborts, 1);
    assert!(log.abort_signal.unwrap().is_aborted());
    assert!(r.presenter.artifacts.borrow().is_empty());
    assert_eq!(r.presenter.winners.borrow().len(), 1);
}

#[test]
fn names_cannot_change_mid_spin() {
    let mut r = rig();
    r.engine.set_names(&["A", "B"]).unwrap();
    r.engine.spin(0.0).unwrap();
    assert!(matches!(
        r.engine.set_names(&["X", "Y"]),
        Err(WheelError::Precondition(_))
    ));
    assert_eq!(r.engine.state().segments()[0].label, "A");
}

#[test]
fn set_names_redraws_at_current_rotation() {
    let mut r = rig();
    r.engine.set_names(&["A", "B"]).unwrap();
    assert_eq!(*r.renderer.rotations.borrow(), vec![0.0]);
    assert!(matches!(
        r.engine.set_names(&Vec::<String>::new()),
        Err(WheelError::Validation(_))
    ));
}

#[test]
fn render_failure_cancels_the_spin() {
    let mut r = rig();
    r.engine.set_names(&["A", "B"]).unwrap();
    r.engine.spin(0.0).unwrap();
    *r.renderer.fail.borrow_mut() = true;
    r.scheduler.take();
    assert!(matches!(r.engine.on_frame(10.0), Err(WheelError::Render(_))));
    assert!(!r.engine.state().is_spinning());
    assert!(!r.scheduler.is_pending());
    assert!(r.presenter.winners.borrow().is_empty());
}

#[test]
fn reset_clears_the_wheel() {
    let mut r = rig();
    r.engine.set_names(&["A", "B", "C"]).unwrap();
    r.engine.spin_with(0.0, bob_choice()).unwrap();
    r.scheduler.take();
    r.engine.on_frame(300.0).unwrap();
    r.engine.reset().unwrap();
    assert!(r.engine.state().segments().is_empty());
    assert_eq!(r.engine.state().rotation_degrees(), 0.0);
    assert!(!r.engine.state().is_spinning());
    assert!(!r.scheduler.is_pending());
}

#[test]
fn seeded_engines_make_the_same_draws() {
    let mut a = rig();
    let mut b = rig();
    for r in [&mut a, &mut b] {
        r.engine.set_names(&["A", "B", "C", "D", "E"]).unwrap();
        r.engine.spin(0.0).unwrap();
    }
    assert_eq!(a.engine.plan(), b.engine.plan());
}

#[test]
fn set_segments_enforces_the_segment_invariants() {
    let mut r = rig();
    r.engine.set_names(&["A", "B"]).unwrap();

    assert!(matches!(
        r.engine.set_segments(Vec::new()),
        Err(WheelError::Validation(_))
    ));

    let mut segs = build_segments(&["X", "Y"], r.engine.config()).unwrap();
    segs[1].label = "   ".to_owned();
    assert!(matches!(
        r.engine.set_segments(segs),
        Err(WheelError::Validation(_))
    ));

    let too_many = build_segments(&["p"; 20], r.engine.config()).unwrap();
    let mut capped = rig_with_max(3);
    assert!(matches!(
        capped.engine.set_segments(too_many),
        Err(WheelError::Validation(_))
    ));

    // Rejected replacements leave the wheel alone.
    let labels: Vec<_> = r.engine.state().segments().iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, ["A", "B"]);
}

fn rig_with_max(max_segments: usize) -> Rig {
    let cfg = WheelConfig {
        max_segments,
        seed: Some(1),
        ..WheelConfig::default()
    };
    rig_from(cfg, InMemoryCapture::new())
}
