use super::*;
use crate::capture::memory::InMemoryCapture;
use crate::config::WheelConfig;
use crate::present::LogPresenter;
use crate::render::cpu::CpuRenderer;
use crate::spin::engine::EngineParts;

fn engine(cfg: WheelConfig, scheduler: &ManualScheduler, capture: InMemoryCapture) -> SpinEngine {
    let renderer = CpuRenderer::from_config(&cfg).unwrap();
    SpinEngine::new(
        cfg,
        EngineParts {
            renderer: Box::new(renderer),
            capture: Some(Box::new(capture)),
            presenter: Box::new(LogPresenter),
            scheduler: Box::new(scheduler.clone()),
        },
    )
    .unwrap()
}

fn small_cfg() -> WheelConfig {
    WheelConfig {
        canvas_size: 32.0,
        pointer_size: 4.0,
        duration_min_ms: 300.0,
        duration_max_ms: 300.0,
        seed: Some(3),
        ..WheelConfig::default()
    }
}

#[test]
fn manual_scheduler_tracks_requests() {
    let mut s = ManualScheduler::new();
    let handle = s.clone();
    assert!(!handle.is_pending());
    s.request_frame();
    assert!(handle.is_pending());
    s.cancel_frame();
    assert!(!handle.take());
    s.request_frame();
    assert!(handle.take());
    assert!(!handle.is_pending());
    assert_eq!(handle.requests(), 2);
}

#[test]
fn simulated_run_finishes_with_an_artifact() {
    let sched = ManualScheduler::new();
    let capture = InMemoryCapture::new();
    let mut e = engine(small_cfg(), &sched, capture.clone());
    e.set_names(&["Ann", "Ben", "Cat", "Dan"]).unwrap();

    let report = run_spin(
        &mut e,
        &sched,
        DriveOpts {
            frame_interval_ms: 10.0,
            ..DriveOpts::default()
        },
    )
    .unwrap();
    assert_eq!(report.frames, 30);
    assert!(["Ann", "Ben", "Cat", "Dan"].contains(&report.result.winner.as_str()));
    let artifact = report.artifact.unwrap();
    assert_eq!(artifact.frame_count, 15);
    assert_eq!(capture.log().frames.len(), 15);
}

#[test]
fn run_rejects_single_name_wheels() {
    let sched = ManualScheduler::new();
    let mut e = engine(small_cfg(), &sched, InMemoryCapture::new());
    e.set_names(&["Only"]).unwrap();
    assert!(matches!(
        run_spin(&mut e, &sched, DriveOpts::default()),
        Err(WheelError::Precondition(_))
    ));
}

#[test]
fn run_rejects_bad_interval() {
    let sched = ManualScheduler::new();
    let mut e = engine(small_cfg(), &sched, InMemoryCapture::new());
    e.set_names(&["A", "B"]).unwrap();
    let opts = DriveOpts {
        frame_interval_ms: 0.0,
        ..DriveOpts::default()
    };
    assert!(run_spin(&mut e, &sched, opts).is_err());
}
