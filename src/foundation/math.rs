pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Reduce any finite angle into `[0, 360)`.
pub fn normalize_degrees(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if r >= 360.0 { 0.0 } else { r }
}

/// Normalize, then snap to 1e-6 degree so `r` and `r + 360k` land on the same value.
pub(crate) fn quantize_degrees(deg: f64) -> f64 {
    let q = (normalize_degrees(deg) * 1e6).round() / 1e6;
    if q >= 360.0 { 0.0 } else { q }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
