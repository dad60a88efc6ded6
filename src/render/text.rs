use crate::foundation::error::{WheelError, WheelResult};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

/// Shapes segment labels with a single registered font. Layouts are cached per label text, so
/// redrawing the same wheel never re-shapes.
pub(crate) struct LabelEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
    size_px: f32,
    brush: TextBrushRgba8,
    cache: HashMap<String, Arc<parley::Layout<TextBrushRgba8>>>,
}

impl LabelEngine {
    pub(crate) fn from_path(path: &Path, size_px: f32, rgba: [u8; 4]) -> WheelResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            WheelError::validation(format!("failed to read label font '{}': {e}", path.display()))
        })?;
        Self::from_font_bytes(bytes, size_px, rgba)
    }

    pub(crate) fn from_font_bytes(bytes: Vec<u8>, size_px: f32, rgba: [u8; 4]) -> WheelResult<Self> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(WheelError::validation(
                "label size_px must be finite and > 0",
            ));
        }

        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            WheelError::validation("no font families registered from label font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| WheelError::validation("registered label font family has no name"))?
            .to_string();

        let [r, g, b, a] = rgba;
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0),
            size_px,
            brush: TextBrushRgba8 { r, g, b, a },
            cache: HashMap::new(),
        })
    }

    pub(crate) fn font(&self) -> &vello_cpu::peniko::FontData {
        &self.font
    }

    /// Layout for `text`, or `None` when there is nothing to draw.
    pub(crate) fn layout(&mut self, text: &str) -> Option<Arc<parley::Layout<TextBrushRgba8>>> {
        if text.trim().is_empty() {
            return None;
        }
        if let Some(l) = self.cache.get(text) {
            return Some(Arc::clone(l));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(self.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(self.brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        let layout = Arc::new(layout);
        self.cache.insert(text.to_owned(), Arc::clone(&layout));
        Some(layout)
    }
}
