use crate::foundation::error::{WheelError, WheelResult};

pub use kurbo::{Affine, BezPath, Point, Vec2};

/// Raster surface dimensions in device pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas. Both sides must be in `1..=u16::MAX`.
    pub fn new(width: u32, height: u32) -> WheelResult<Self> {
        if width == 0 || height == 0 {
            return Err(WheelError::validation("canvas width/height must be > 0"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(WheelError::validation(format!(
                "canvas {width}x{height} exceeds {} px per side",
                u16::MAX
            )));
        }
        Ok(Self { width, height })
    }

    /// Square canvas of `logical` units scaled by `pixel_ratio` (rounded up).
    pub fn scaled_square(logical: f64, pixel_ratio: f64) -> WheelResult<Self> {
        if !logical.is_finite() || logical <= 0.0 {
            return Err(WheelError::validation("canvas size must be finite and > 0"));
        }
        if !pixel_ratio.is_finite() || pixel_ratio <= 0.0 {
            return Err(WheelError::validation("pixel_ratio must be finite and > 0"));
        }
        let side = (logical * pixel_ratio).ceil();
        if side > f64::from(u16::MAX) {
            return Err(WheelError::validation(format!(
                "scaled canvas side {side} exceeds {} px",
                u16::MAX
            )));
        }
        Self::new(side as u32, side as u32)
    }

    /// Byte length of a tightly packed RGBA8 buffer of this size.
    pub fn rgba_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Opaque color from straight RGB.
    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Channels as `[r, g, b, a]`.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub(crate) fn to_cpu_color(self) -> vello_cpu::peniko::Color {
        // peniko colors are straight alpha; undo the premultiply for translucent values.
        if self.a == 0 {
            return vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 0);
        }
        if self.a == 255 {
            return vello_cpu::peniko::Color::from_rgba8(self.r, self.g, self.b, 255);
        }
        let unpremul = |c: u8| -> u8 {
            ((u16::from(c) * 255 + u16::from(self.a) / 2) / u16::from(self.a)).min(255) as u8
        };
        vello_cpu::peniko::Color::from_rgba8(
            unpremul(self.r),
            unpremul(self.g),
            unpremul(self.b),
            self.a,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
