//! Wheel configuration.
//!
//! Defaults reproduce the classic widget: 20 names max, five full turns, a 5-6 s spin, pointer at
//! the top, every second frame captured at 50 ms per GIF frame, 30 s to assemble the GIF.

use crate::animation::ease::Ease;
use crate::foundation::error::{WheelError, WheelResult};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Hard upper bound on names per wheel.
pub const MAX_SEGMENTS: usize = 20;

/// Fewest full turns a spin may be configured with.
pub const MIN_EXTRA_SPINS: u32 = 5;

/// Pointer at the top of the wheel in y-down raster space.
pub const DEFAULT_POINTER_ANGLE_DEGREES: f64 = 270.0;

/// Tunables for the segment model, renderer, spin engine and GIF capture.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WheelConfig {
    /// Maximum number of names, `1..=MAX_SEGMENTS`.
    pub max_segments: usize,
    /// Full rotations added to every spin before the alignment turn.
    pub extra_spins: u32,
    /// Lower bound of the randomized spin duration.
    pub duration_min_ms: f64,
    /// Upper bound of the randomized spin duration.
    pub duration_max_ms: f64,
    /// Where the pointer sits, clockwise from +x in y-down raster space.
    pub pointer_angle_degrees: f64,
    /// Deceleration curve.
    pub ease: Ease,
    /// Capture one frame out of every `capture_every` animation frames.
    pub capture_every: u32,
    /// Display time of each captured frame in the exported artifact.
    pub frame_delay_ms: u32,
    /// How long to wait for the exported artifact before giving up on it.
    pub artifact_timeout_ms: f64,
    /// Logical side length of the square drawing surface.
    pub canvas_size: f64,
    /// Device pixels per logical unit.
    pub pixel_ratio: f64,
    /// Segment color saturation, `[0, 1]`.
    pub saturation: f64,
    /// Segment color lightness, `[0, 1]`.
    pub lightness: f64,
    /// Straight RGBA8 the surface is cleared to before each frame.
    pub background_rgba: [u8; 4],
    /// TTF/OTF file used for segment labels. Labels are skipped without one.
    pub label_font: Option<PathBuf>,
    /// Label font size in logical units.
    pub label_size_px: f32,
    /// Distance between a label's end and the wheel rim.
    pub label_inset: f64,
    /// Straight RGBA8 label color.
    pub label_rgba: [u8; 4],
    /// Length of the pointer graphic.
    pub pointer_size: f64,
    /// Straight RGBA8 pointer color.
    pub pointer_rgba: [u8; 4],
    /// GIF encoder speed, `1..=30` (lower is slower and better).
    pub gif_speed: i32,
    /// Frame cadence of the headless driver.
    pub fps: u32,
    /// Fixed RNG seed; fresh entropy when absent.
    pub seed: Option<u64>,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            max_segments: MAX_SEGMENTS,
            extra_spins: MIN_EXTRA_SPINS,
            duration_min_ms: 5000.0,
            duration_max_ms: 6000.0,
            pointer_angle_degrees: DEFAULT_POINTER_ANGLE_DEGREES,
            ease: Ease::OutCubic,
            capture_every: 2,
            frame_delay_ms: 50,
            artifact_timeout_ms: 30_000.0,
            canvas_size: 400.0,
            pixel_ratio: 1.0,
            saturation: 0.7,
            lightness: 0.6,
            background_rgba: [255, 255, 255, 255],
            label_font: None,
            label_size_px: 16.0,
            label_inset: 20.0,
            label_rgba: [255, 255, 255, 255],
            pointer_size: 20.0,
            pointer_rgba: [51, 51, 51, 255],
            gif_speed: 10,
            fps: 60,
            seed: None,
        }
    }
}

impl WheelConfig {
    /// Parse a config from a JSON reader and validate it.
    pub fn from_reader<R: std::io::Read>(r: R) -> WheelResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| WheelError::validation(format!("parse wheel config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a config from a JSON file on disk and validate it.
    pub fn from_path(path: impl AsRef<Path>) -> WheelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            WheelError::validation(format!("open wheel config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> WheelResult<()> {
        if self.max_segments == 0 || self.max_segments > MAX_SEGMENTS {
            return Err(WheelError::validation(format!(
                "max_segments must be in 1..={MAX_SEGMENTS}"
            )));
        }
        if self.extra_spins < MIN_EXTRA_SPINS {
            return Err(WheelError::validation(format!(
                "extra_spins must be >= {MIN_EXTRA_SPINS}"
            )));
        }
        if !self.duration_min_ms.is_finite()
            || !self.duration_max_ms.is_finite()
            || self.duration_min_ms <= 0.0
            || self.duration_min_ms > self.duration_max_ms
        {
            return Err(WheelError::validation(
                "duration band must satisfy 0 < duration_min_ms <= duration_max_ms",
            ));
        }
        if !self.pointer_angle_degrees.is_finite() {
            return Err(WheelError::validation("pointer_angle_degrees must be finite"));
        }
        if self.capture_every == 0 {
            return Err(WheelError::validation("capture_every must be >= 1"));
        }
        if !self.artifact_timeout_ms.is_finite() || self.artifact_timeout_ms < 0.0 {
            return Err(WheelError::validation(
                "artifact_timeout_ms must be finite and >= 0",
            ));
        }
        if !(0.0..=1.0).contains(&self.saturation) || !(0.0..=1.0).contains(&self.lightness) {
            return Err(WheelError::validation(
                "saturation and lightness must be in [0, 1]",
            ));
        }
        if !self.label_size_px.is_finite() || self.label_size_px <= 0.0 {
            return Err(WheelError::validation("label_size_px must be finite and > 0"));
        }
        if !self.label_inset.is_finite() || !self.pointer_size.is_finite() || self.pointer_size < 0.0
        {
            return Err(WheelError::validation(
                "label_inset and pointer_size must be finite (pointer_size >= 0)",
            ));
        }
        if !(1..=30).contains(&self.gif_speed) {
            return Err(WheelError::validation("gif_speed must be in 1..=30"));
        }
        if self.fps == 0 {
            return Err(WheelError::validation("fps must be > 0"));
        }
        // Surface size checks live with the canvas type.
        crate::foundation::core::Canvas::scaled_square(self.canvas_size, self.pixel_ratio)?;
        Ok(())
    }

    /// Interval between headless driver frames.
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / f64::from(self.fps.max(1))
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
