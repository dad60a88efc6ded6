use crate::animation::ease::Ease;
use crate::config::WheelConfig;
use crate::foundation::error::{WheelError, WheelResult};
use crate::wheel::geometry::{segment_angle, spin_delta};
use rand::Rng;

/// The part of [`WheelConfig`] a spin plan depends on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpinTuning {
    /// Full turns before alignment.
    pub extra_spins: u32,
    /// Shortest spin.
    pub duration_min_ms: f64,
    /// Longest spin.
    pub duration_max_ms: f64,
    /// Fixed pointer position.
    pub pointer_angle_degrees: f64,
    /// Deceleration curve.
    pub ease: Ease,
}

impl SpinTuning {
    /// Pull the spin tunables out of a config.
    pub fn from_config(cfg: &WheelConfig) -> Self {
        Self {
            extra_spins: cfg.extra_spins,
            duration_min_ms: cfg.duration_min_ms,
            duration_max_ms: cfg.duration_max_ms,
            pointer_angle_degrees: cfg.pointer_angle_degrees,
            ease: cfg.ease,
        }
    }
}

impl Default for SpinTuning {
    fn default() -> Self {
        Self::from_config(&WheelConfig::default())
    }
}

/// The random draws behind one spin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpinChoice {
    /// Segment that will win.
    pub target_segment_index: usize,
    /// Offset inside the winning segment, `[0, a/2)`.
    pub jitter_degrees: f64,
    /// Spin length.
    pub duration_ms: f64,
}

impl SpinChoice {
    /// Draw a target, a jitter and a duration for an `n`-segment wheel.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, n: usize, tuning: &SpinTuning) -> Self {
        let half = segment_angle(n) / 2.0;
        Self {
            target_segment_index: rng.random_range(0..n.max(1)),
            jitter_degrees: rng.random_range(0.0..half),
            duration_ms: rng.random_range(tuning.duration_min_ms..=tuning.duration_max_ms),
        }
    }

    /// Check the draws against an `n`-segment wheel.
    pub fn validate(&self, n: usize) -> WheelResult<()> {
        if self.target_segment_index >= n {
            return Err(WheelError::validation(format!(
                "target segment {} out of range for {n} segments",
                self.target_segment_index
            )));
        }
        let half = segment_angle(n) / 2.0;
        if !self.jitter_degrees.is_finite() || !(0.0..half).contains(&self.jitter_degrees) {
            return Err(WheelError::validation(format!(
                "jitter must be in [0, {half})"
            )));
        }
        if !self.duration_ms.is_finite() || self.duration_ms <= 0.0 {
            return Err(WheelError::validation("spin duration must be finite and > 0"));
        }
        Ok(())
    }
}

/// Immutable description of a running spin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpinPlan {
    /// Segment the wheel will stop on.
    pub target_segment_index: usize,
    /// Segment count when the spin started.
    pub segment_count: usize,
    /// Offset inside the winning segment.
    pub jitter_degrees: f64,
    /// Rotation added over the whole spin.
    pub target_rotation_degrees: f64,
    /// Rotation when the spin started.
    pub start_rotation_degrees: f64,
    /// Host timestamp of the spin start.
    pub start_timestamp_ms: f64,
    /// Spin length.
    pub duration_ms: f64,
}

impl SpinPlan {
    /// Plan a spin from `start_rotation` at `now_ms`.
    pub fn from_choice(
        choice: SpinChoice,
        n: usize,
        start_rotation_degrees: f64,
        now_ms: f64,
        tuning: &SpinTuning,
    ) -> WheelResult<Self> {
        choice.validate(n)?;
        if !start_rotation_degrees.is_finite() || !now_ms.is_finite() {
            return Err(WheelError::validation(
                "start rotation and timestamp must be finite",
            ));
        }
        let target_rotation_degrees = spin_delta(
            start_rotation_degrees,
            choice.target_segment_index,
            n,
            choice.jitter_degrees,
            tuning.extra_spins,
            tuning.pointer_angle_degrees,
        );
        Ok(Self {
            target_segment_index: choice.target_segment_index,
            segment_count: n,
            jitter_degrees: choice.jitter_degrees,
            target_rotation_degrees,
            start_rotation_degrees,
            start_timestamp_ms: now_ms,
            duration_ms: choice.duration_ms,
        })
    }

    /// Linear progress in `[0, 1]` at `now_ms`.
    pub fn progress(&self, now_ms: f64) -> f64 {
        ((now_ms - self.start_timestamp_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Wheel rotation at `now_ms` under `ease`.
    pub fn rotation_at(&self, ease: Ease, now_ms: f64) -> f64 {
        self.start_rotation_degrees + self.target_rotation_degrees * ease.apply(self.progress(now_ms))
    }

    /// Rotation once the spin has finished.
    pub fn final_rotation(&self) -> f64 {
        self.start_rotation_degrees + self.target_rotation_degrees
    }
}

#[cfg(test)]
#[path = "../../tests/unit/spin/plan.rs"]
mod tests;
