use crate::foundation::core::Rgba8Premul;

/// HSL to opaque RGB8. `h` in degrees (any finite value), `s` and `l` in `[0, 1]`.
pub(crate) fn hsl_to_rgba8(h: f64, s: f64, l: f64) -> Rgba8Premul {
    let h = (h % 360.0 + 360.0) % 360.0 / 360.0;
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    fn to_u8(x: f64) -> u8 {
        (x.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    if s == 0.0 {
        let v = to_u8(l);
        return Rgba8Premul::opaque(v, v, v);
    }

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    Rgba8Premul::opaque(
        to_u8(hue_to_rgb(p, q, h + 1.0 / 3.0)),
        to_u8(hue_to_rgb(p, q, h)),
        to_u8(hue_to_rgb(p, q, h - 1.0 / 3.0)),
    )
}
