//! Where winners and artifacts end up.

use crate::capture::Artifact;

/// Receives the outcome of a spin.
///
/// `show_winner` is called as soon as the wheel stops; `show_artifact` follows later, at most
/// once per spin, and only if the recording could be assembled in time.
pub trait ResultPresenter {
    /// Announce the winning label.
    fn show_winner(&mut self, winner: &str);

    /// Offer the recording of the spin.
    fn show_artifact(&mut self, artifact: &Artifact);
}

/// Presenter that only logs.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogPresenter;

impl ResultPresenter for LogPresenter {
    fn show_winner(&mut self, winner: &str) {
        tracing::info!(winner, "wheel stopped");
    }

    fn show_artifact(&mut self, artifact: &Artifact) {
        tracing::info!(
            file = %artifact.suggested_file_name,
            mime = artifact.mime,
            bytes = artifact.bytes.len(),
            frames = artifact.frame_count,
            "spin recording ready"
        );
    }
}
