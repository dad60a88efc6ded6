/// Easing curves mapping normalized spin progress to normalized rotation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// Linear interpolation.
    Linear,
    /// Quadratic ease-out.
    OutQuad,
    /// Cubic ease-out, `1 - (1 - t)^3`. Decelerates like friction.
    #[default]
    OutCubic,
    /// Quartic ease-out.
    OutQuart,
}

impl Ease {
    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::OutQuart => 1.0 - (1.0 - t).powi(4),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
