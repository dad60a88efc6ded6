use super::*;

const POINTER: f64 = 270.0;

#[test]
fn spans_tile_the_circle() {
    for n in 1..=20 {
        let mut prev_end = 0.0;
        for i in 0..n {
            let (s, e) = segment_span(i, n);
            assert!((s - prev_end).abs() < 1e-9);
            assert!(e > s);
            prev_end = e;
        }
        assert!((prev_end - 360.0).abs() < 1e-9);
    }
}

#[test]
fn winner_at_rest_is_the_segment_under_the_pointer() {
    // Unrotated three-segment wheel: [0,120) [120,240) [240,360). Pointer at 270 hits #2.
    assert_eq!(winning_index(0.0, 3, POINTER), Some(2));
    // Rotating by 90 moves segment #1 (local 180) under the pointer.
    assert_eq!(winning_index(90.0, 3, POINTER), Some(1));
    assert_eq!(winning_index(90.0 + 3600.0, 3, POINTER), Some(1));
    assert_eq!(winning_index(90.0 - 720.0, 3, POINTER), Some(1));
}

#[test]
fn winner_handles_degenerate_inputs() {
    assert_eq!(winning_index(10.0, 0, POINTER), None);
    assert_eq!(winning_index(f64::NAN, 3, POINTER), None);
    assert_eq!(winning_index(123.0, 1, POINTER), Some(0));
}

#[test]
fn worked_example_three_names() {
    // Alice/Bob/Carol, target Bob (#1), jitter 30, five extra spins, from rest.
    let delta = spin_delta(0.0, 1, 3, 30.0, 5, POINTER);
    assert!((delta - 1890.0).abs() < 1e-9, "delta={delta}");
    assert_eq!(winning_index(delta, 3, POINTER), Some(1));
}

#[test]
fn delta_is_forward_and_at_least_the_extra_spins() {
    for n in 2..=20 {
        for t in 0..n {
            let d = spin_delta(987.25, t, n, 0.0, 5, POINTER);
            assert!(d >= 1800.0 && d < 2160.0, "n={n} t={t} d={d}");
        }
    }
}

#[test]
fn jitter_cancels_for_every_count_target_and_jitter() {
    for pointer in [POINTER, 0.0, 90.0, -45.0] {
        for n in 2..=20usize {
            let a = segment_angle(n);
            for t in 0..n {
                for step in 0..50 {
                    // Sample [0, a/2) including its lower edge and points right below a/2.
                    let jitter = (a / 2.0) * (f64::from(step) / 50.0);
                    let jitter_hi = (a / 2.0) * (1.0 - 1e-9);
                    for j in [jitter, jitter_hi] {
                        for start in [0.0, 17.5, 2070.0, 123_456.789] {
                            let delta = spin_delta(start, t, n, j, 5, pointer);
                            let end = start + delta;
                            assert_eq!(
                                winning_index(end, n, pointer),
                                Some(t),
                                "pointer={pointer} n={n} t={t} j={j} start={start}"
                            );
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn stop_point_stays_in_the_middle_half() {
    for n in 2..=20usize {
        let a = segment_angle(n);
        for t in 0..n {
            for j in [0.0, a / 8.0, a / 2.0 - 1e-9] {
                let end = spin_delta(0.0, t, n, j, 5, POINTER);
                let local = crate::foundation::math::normalize_degrees(POINTER - end);
                let offset = local - t as f64 * a;
                assert!(offset >= a / 4.0 - 1e-9 && offset < 3.0 * a / 4.0 + 1e-9);
            }
        }
    }
}
