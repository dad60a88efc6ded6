use super::*;
use std::sync::mpsc;

fn artifact() -> Artifact {
    Artifact {
        bytes: vec![1, 2, 3],
        mime: "image/gif",
        frame_count: 1,
        suggested_file_name: DEFAULT_ARTIFACT_NAME.to_owned(),
    }
}

#[test]
fn resolved_yields_once() {
    let mut p = PendingArtifact::resolved(Ok(artifact()));
    assert_eq!(p.try_take().unwrap().unwrap(), artifact());
    assert!(p.try_take().is_none());
}

#[test]
fn channel_is_pending_until_sent() {
    let (tx, rx) = mpsc::channel();
    let mut p = PendingArtifact::from_channel(rx);
    assert!(p.try_take().is_none());
    tx.send(Ok(artifact())).unwrap();
    assert!(p.try_take().unwrap().is_ok());
    assert!(p.try_take().is_none());
}

#[test]
fn dropped_sender_is_a_capture_error() {
    let (tx, rx) = mpsc::channel::<WheelResult<Artifact>>();
    drop(tx);
    let mut p = PendingArtifact::from_channel(rx);
    assert!(matches!(p.try_take(), Some(Err(WheelError::Capture(_)))));
}

#[test]
fn wait_timeout_gives_up() {
    let (_tx, rx) = mpsc::channel::<WheelResult<Artifact>>();
    let mut p = PendingArtifact::from_channel(rx);
    assert!(p.wait_timeout(Duration::from_millis(5)).is_none());
}

#[test]
fn abort_signal_is_shared_between_clones() {
    let a = AbortSignal::new();
    let b = a.clone();
    assert!(!b.is_aborted());
    a.abort();
    assert!(b.is_aborted());
}
