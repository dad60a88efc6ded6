use super::*;

#[test]
fn canvas_rejects_zero_and_oversized_sides() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert!(Canvas::new(70_000, 10).is_err());
    assert_eq!(Canvas::new(4, 3).unwrap().rgba_len(), 48);
}

#[test]
fn scaled_square_rounds_up() {
    let c = Canvas::scaled_square(400.0, 1.5).unwrap();
    assert_eq!((c.width, c.height), (600, 600));

    let c = Canvas::scaled_square(10.0, 1.25).unwrap();
    assert_eq!(c.width, 13);

    assert!(Canvas::scaled_square(400.0, 0.0).is_err());
    assert!(Canvas::scaled_square(f64::NAN, 1.0).is_err());
}

#[test]
fn premul_from_straight() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.a, 128);
    assert_eq!(c.r, 128);
    assert_eq!(c.g, 64);
    assert_eq!(c.b, 0);
    assert_eq!(Rgba8Premul::opaque(1, 2, 3).to_array(), [1, 2, 3, 255]);
}
