use crate::config::WheelConfig;
use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rgba8Premul, Vec2};
use crate::foundation::error::{WheelError, WheelResult};
use crate::foundation::math::quantize_degrees;
use crate::render::backend::{FrameRGBA, WheelRenderer};
use crate::render::text::LabelEngine;
use crate::wheel::geometry::segment_span;
use crate::wheel::segment::Segment;
use kurbo::Shape;
use std::path::PathBuf;

const PATH_TOLERANCE: f64 = 0.1;

/// Options for [`CpuRenderer`]. Lengths are logical units, scaled by `pixel_ratio`.
#[derive(Debug, Clone)]
pub struct CpuRendererOpts {
    /// Side of the square drawing surface.
    pub canvas_size: f64,
    /// Device pixels per logical unit.
    pub pixel_ratio: f64,
    /// Straight RGBA8 clear color.
    pub background_rgba: [u8; 4],
    /// Pointer position, clockwise from +x.
    pub pointer_angle_degrees: f64,
    /// Pointer length; `0` hides it.
    pub pointer_size: f64,
    /// Straight RGBA8 pointer color.
    pub pointer_rgba: [u8; 4],
    /// Gap between a label's end and the rim.
    pub label_inset: f64,
    /// Label font size.
    pub label_size_px: f32,
    /// Straight RGBA8 label color.
    pub label_rgba: [u8; 4],
    /// Label font file.
    pub label_font: Option<PathBuf>,
}

impl Default for CpuRendererOpts {
    fn default() -> Self {
        Self::from_config(&WheelConfig::default())
    }
}

impl CpuRendererOpts {
    /// Pick the renderer fields out of a [`WheelConfig`].
    pub fn from_config(cfg: &WheelConfig) -> Self {
        Self {
            canvas_size: cfg.canvas_size,
            pixel_ratio: cfg.pixel_ratio,
            background_rgba: cfg.background_rgba,
            pointer_angle_degrees: cfg.pointer_angle_degrees,
            pointer_size: cfg.pointer_size,
            pointer_rgba: cfg.pointer_rgba,
            label_inset: cfg.label_inset,
            label_size_px: cfg.label_size_px,
            label_rgba: cfg.label_rgba,
            label_font: cfg.label_font.clone(),
        }
    }

    /// Radius of the wheel, leaving room for the part of the pointer outside the rim.
    pub fn wheel_radius(&self) -> f64 {
        (self.canvas_size / 2.0 - self.pointer_size * 0.5).max(1.0)
    }
}

/// CPU wheel renderer powered by `vello_cpu`.
pub struct CpuRenderer {
    opts: CpuRendererOpts,
    canvas: Canvas,
    ctx: Option<vello_cpu::RenderContext>,
    pixmap: vello_cpu::Pixmap,
    labels: Option<LabelEngine>,
    warned_no_font: bool,
}

impl CpuRenderer {
    /// Create a renderer; reads the label font from disk when one is configured.
    pub fn new(opts: CpuRendererOpts) -> WheelResult<Self> {
        let canvas = Canvas::scaled_square(opts.canvas_size, opts.pixel_ratio)?;
        let labels = match opts.label_font.as_deref() {
            Some(path) => Some(LabelEngine::from_path(
                path,
                opts.label_size_px,
                opts.label_rgba,
            )?),
            None => None,
        };
        Ok(Self {
            pixmap: vello_cpu::Pixmap::new(canvas.width as u16, canvas.height as u16),
            opts,
            canvas,
            ctx: None,
            labels,
            warned_no_font: false,
        })
    }

    /// Shortcut for `CpuRenderer::new(CpuRendererOpts::from_config(cfg))`.
    pub fn from_config(cfg: &WheelConfig) -> WheelResult<Self> {
        Self::new(CpuRendererOpts::from_config(cfg))
    }

    /// Use in-memory font bytes for labels instead of a file.
    pub fn with_label_font_bytes(mut self, bytes: Vec<u8>) -> WheelResult<Self> {
        self.labels = Some(LabelEngine::from_font_bytes(
            bytes,
            self.opts.label_size_px,
            self.opts.label_rgba,
        )?);
        Ok(self)
    }

    /// Options this renderer was built with.
    pub fn opts(&self) -> &CpuRendererOpts {
        &self.opts
    }

    fn with_ctx_mut<R>(
        &mut self,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> WheelResult<R>,
    ) -> WheelResult<R> {
        let width = self.canvas.width as u16;
        let height = self.canvas.height as u16;
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx);
        if out.is_ok() {
            ctx.flush();
            ctx.render_to_pixmap(&mut self.pixmap);
        }
        self.ctx = Some(ctx);
        out
    }

    fn draw(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        segments: &[Segment],
        angle_degrees: f64,
    ) -> WheelResult<()> {
        let [r, g, b, a] = self.opts.background_rgba;
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.canvas.width),
            f64::from(self.canvas.height),
        ));

        if segments.is_empty() {
            return Ok(());
        }

        let half = self.opts.canvas_size / 2.0;
        let screen = Affine::scale(self.opts.pixel_ratio) * Affine::translate(Vec2::new(half, half));
        let wheel = screen * Affine::rotate(angle_degrees.to_radians());
        let radius = self.opts.wheel_radius();
        let n = segments.len();

        ctx.set_transform(affine_to_cpu(wheel));
        for (i, seg) in segments.iter().enumerate() {
            ctx.set_paint(seg.color.to_cpu_color());
            ctx.fill_path(&bezpath_to_cpu(&slice_path(i, n, radius)));
        }

        self.draw_labels(ctx, segments, wheel, radius);

        if self.opts.pointer_size > 0.0 {
            let pointer = screen * Affine::rotate(self.opts.pointer_angle_degrees.to_radians());
            let [r, g, b, a] = self.opts.pointer_rgba;
            ctx.set_transform(affine_to_cpu(pointer));
            ctx.set_paint(Rgba8Premul::from_straight_rgba(r, g, b, a).to_cpu_color());
            ctx.fill_path(&bezpath_to_cpu(&pointer_path(
                radius,
                self.opts.pointer_size,
            )));
        }

        Ok(())
    }

    fn draw_labels(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        segments: &[Segment],
        wheel: Affine,
        radius: f64,
    ) {
        let Some(engine) = self.labels.as_mut() else {
            if !self.warned_no_font {
                tracing::warn!("no label font configured; drawing segments without labels");
                self.warned_no_font = true;
            }
            return;
        };

        let n = segments.len();
        for (i, seg) in segments.iter().enumerate() {
            let Some(layout) = engine.layout(&seg.label) else {
                continue;
            };
            let (start, end) = segment_span(i, n);
            let mid = (start + end) / 2.0;
            let w = f64::from(layout.width());
            let h = f64::from(layout.height());
            // Right-aligned at the rim, vertically centered on the bisector.
            let tr = wheel
                * Affine::rotate(mid.to_radians())
                * Affine::translate(Vec2::new(radius - self.opts.label_inset - w, -h / 2.0));
            ctx.set_transform(affine_to_cpu(tr));

            for line in layout.lines() {
                for item in line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };
                    let brush = run.style().brush;
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        brush.r, brush.g, brush.b, brush.a,
                    ));
                    let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(engine.font())
                        .font_size(run.run().font_size())
                        .fill_glyphs(glyphs);
                }
            }
        }
    }
}

impl WheelRenderer for CpuRenderer {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn render(&mut self, segments: &[Segment], rotation_degrees: f64) -> WheelResult<()> {
        if !rotation_degrees.is_finite() {
            return Err(WheelError::validation(format!(
                "rotation must be finite, got {rotation_degrees}"
            )));
        }
        let angle = quantize_degrees(rotation_degrees);
        self.with_ctx_mut(|this, ctx| this.draw(ctx, segments, angle))
    }

    fn snapshot(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }
}

/// Pie slice for segment `index` of `n`, centered on the origin.
fn slice_path(index: usize, n: usize, radius: f64) -> BezPath {
    if n == 1 {
        return kurbo::Circle::new(Point::ORIGIN, radius).to_path(PATH_TOLERANCE);
    }
    let (start, end) = segment_span(index, n);
    kurbo::CircleSegment::new(
        Point::ORIGIN,
        radius,
        0.0,
        start.to_radians(),
        (end - start).to_radians(),
    )
    .to_path(PATH_TOLERANCE)
}

/// Arrow along +x with its tip inside the rim.
fn pointer_path(radius: f64, size: f64) -> BezPath {
    let mut p = BezPath::new();
    p.move_to(Point::new(radius - size * 0.6, 0.0));
    p.line_to(Point::new(radius + size * 0.4, -size * 0.35));
    p.line_to(Point::new(radius + size * 0.4, size * 0.35));
    p.close_path();
    p
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
