//! Angle conventions shared by the renderer and the winner computation.
//!
//! Angles are degrees, clockwise from +x in y-down raster space (the 2D canvas convention).
//! Segment `i` of `n` covers `[i * a, (i + 1) * a)` in the wheel's local frame with
//! `a = 360 / n`; a wheel rotated by `r` shows that segment at `[i * a + r, (i + 1) * a + r)`.
//! The pointer is fixed at `pointer_angle`, so the segment under it is the one whose local span
//! contains `pointer_angle - r`.

use crate::foundation::math::normalize_degrees;

/// Angular width of one segment on an `n`-segment wheel.
pub fn segment_angle(n: usize) -> f64 {
    360.0 / n.max(1) as f64
}

/// Local-frame span `[start, end)` of segment `index`.
pub fn segment_span(index: usize, n: usize) -> (f64, f64) {
    let a = segment_angle(n);
    (index as f64 * a, (index + 1) as f64 * a)
}

/// Index of the segment under the pointer for a wheel at `rotation_degrees`.
///
/// `None` for an empty wheel. The raw rotation may be any finite value; it is only reduced
/// modulo 360 here.
pub fn winning_index(rotation_degrees: f64, n: usize, pointer_angle_degrees: f64) -> Option<usize> {
    if n == 0 || !rotation_degrees.is_finite() {
        return None;
    }
    let effective = normalize_degrees(pointer_angle_degrees - rotation_degrees);
    let idx = (effective / segment_angle(n)).floor() as usize;
    Some(idx.min(n - 1))
}

/// Where inside the target segment the wheel stops, as an offset from the segment start.
///
/// `jitter` is drawn from `[0, a/2)`, so the offset covers the middle half `[a/4, 3a/4)` and
/// never touches a boundary.
pub fn landing_offset(n: usize, jitter_degrees: f64) -> f64 {
    segment_angle(n) / 4.0 + jitter_degrees
}

/// Rotation to add to `start_rotation` so that `target` ends up under the pointer after
/// `extra_spins` full turns.
///
/// The alignment term is reduced into `[0, 360)`, so the result is always
/// `>= extra_spins * 360` and the wheel only ever turns forward.
pub fn spin_delta(
    start_rotation: f64,
    target: usize,
    n: usize,
    jitter_degrees: f64,
    extra_spins: u32,
    pointer_angle_degrees: f64,
) -> f64 {
    let stop_local = target as f64 * segment_angle(n) + landing_offset(n, jitter_degrees);
    let align = normalize_degrees(pointer_angle_degrees - start_rotation - stop_local);
    f64::from(extra_spins) * 360.0 + align
}

#[cfg(test)]
#[path = "../../tests/unit/wheel/geometry.rs"]
mod tests;
