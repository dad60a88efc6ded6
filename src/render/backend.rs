use crate::foundation::core::Canvas;
use crate::foundation::error::{WheelError, WheelResult};
use crate::foundation::math::mul_div255_u16;
use crate::wheel::segment::Segment;

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Flatten onto an opaque straight-alpha background, returning opaque RGBA8 bytes.
    ///
    /// GIF and PNG output both go through this so translucent pixels look the same in both.
    pub fn flattened_over(&self, bg_rgba: [u8; 4]) -> WheelResult<Vec<u8>> {
        if !self.premultiplied {
            return Err(WheelError::render(
                "flattening expects a premultiplied frame",
            ));
        }
        let mut out = vec![0u8; self.data.len()];
        flatten_premul_over_bg_to_opaque_rgba8(&mut out, &self.data, bg_rgba)?;
        Ok(out)
    }
}

/// Something that can draw a wheel and hand back the last drawn frame.
///
/// Every `render` call starts from a cleared surface and identity transforms, so no drawing
/// state carries over from one call to the next.
pub trait WheelRenderer {
    /// Surface dimensions in pixels.
    fn canvas(&self) -> Canvas;

    /// Draw `segments` rotated by `rotation_degrees` (any finite value, negative or past 360).
    ///
    /// An empty segment list leaves a cleared surface.
    fn render(&mut self, segments: &[Segment], rotation_degrees: f64) -> WheelResult<()>;

    /// Copy of the most recently rendered pixels.
    fn snapshot(&self) -> FrameRGBA;
}

pub(crate) fn flatten_premul_over_bg_to_opaque_rgba8(
    dst: &mut [u8],
    src_premul: &[u8],
    bg_rgba: [u8; 4],
) -> WheelResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(WheelError::validation(
            "flatten_premul_over_bg_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg_r = bg_rgba[0] as u16;
    let bg_g = bg_rgba[1] as u16;
    let bg_b = bg_rgba[2] as u16;

    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let a = s[3] as u16;
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255u16 - a;
        d[0] = (s[0] as u16 + mul_div255_u16(bg_r, inv)).min(255) as u8;
        d[1] = (s[1] as u16 + mul_div255_u16(bg_g, inv)).min(255) as u8;
        d[2] = (s[2] as u16 + mul_div255_u16(bg_b, inv)).min(255) as u8;
        d[3] = 255;
    }

    Ok(())
}
