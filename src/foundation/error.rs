/// Result alias used across the crate.
pub type WheelResult<T> = Result<T, WheelError>;

/// Error taxonomy for the wheel core.
///
/// Only `Validation` is meant to reach a user directly. `Precondition` is a rejected request,
/// `Capture` and `Timeout` only ever cost the exportable artifact, never the winner.
#[derive(thiserror::Error, Debug)]
pub enum WheelError {
    /// Bad input: zero or too many names, invalid config, non-finite angles.
    #[error("validation error: {0}")]
    Validation(String),

    /// Request not allowed in the current state (already spinning, too few segments).
    #[error("precondition error: {0}")]
    Precondition(String),

    /// Frame capture or artifact assembly failed.
    #[error("capture error: {0}")]
    Capture(String),

    /// Artifact assembly exceeded its deadline.
    #[error("timeout error: {0}")]
    Timeout(String),

    /// Rasterization failed.
    #[error("render error: {0}")]
    Render(String),

    /// Anything else, usually IO with context attached.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WheelError {
    /// Build a [`WheelError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`WheelError::Precondition`].
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Build a [`WheelError::Capture`].
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    /// Build a [`WheelError::Timeout`].
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Build a [`WheelError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// `true` for errors that only degrade the exportable artifact.
    pub fn is_artifact_only(&self) -> bool {
        matches!(self, Self::Capture(_) | Self::Timeout(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
