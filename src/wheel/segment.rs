use crate::config::WheelConfig;
use crate::foundation::color::hsl_to_rgba8;
use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{WheelError, WheelResult};

/// Hue advance between consecutive segments; close to the golden angle so neighbors never
/// share a hue.
pub const HUE_STEP_DEGREES: f64 = 137.5;

/// One labelled slice of the wheel. Position on the wheel is its index in the segment list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    /// Trimmed, non-empty display label.
    pub label: String,
    /// Index the color was derived from.
    pub color_index: usize,
    /// Fill color.
    pub color: Rgba8Premul,
}

/// Color for the segment at `index`: `hue = index * 137.5 mod 360`, fixed saturation and
/// lightness. Independent of the label.
pub fn segment_color(index: usize, saturation: f64, lightness: f64) -> Rgba8Premul {
    let hue = (index as f64 * HUE_STEP_DEGREES) % 360.0;
    hsl_to_rgba8(hue, saturation, lightness)
}

/// Build wheel segments from pre-cleaned names.
///
/// Fails when there are no names or more than `cfg.max_segments`. Labels are trimmed again and
/// blank ones rejected so a [`Segment`] never carries an empty label.
pub fn build_segments<S: AsRef<str>>(names: &[S], cfg: &WheelConfig) -> WheelResult<Vec<Segment>> {
    if names.is_empty() {
        return Err(WheelError::validation("at least one name is required"));
    }
    if names.len() > cfg.max_segments {
        return Err(WheelError::validation(format!(
            "maximum {} names allowed (got {})",
            cfg.max_segments,
            names.len()
        )));
    }

    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let label = name.as_ref().trim();
            if label.is_empty() {
                return Err(WheelError::validation(format!("name #{} is blank", i + 1)));
            }
            Ok(Segment {
                label: label.to_owned(),
                color_index: i,
                color: segment_color(i, cfg.saturation, cfg.lightness),
            })
        })
        .collect()
}

/// Split free text on commas and newlines, trim each entry and drop empty ones.
///
/// Duplicates are kept: the same name twice gets two segments.
pub fn parse_names(text: &str) -> Vec<String> {
    text.split([',', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/wheel/segment.rs"]
mod tests;
