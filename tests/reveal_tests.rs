use ar_core::{interpolate, Tween};
use proptest::prelude::*;
use std::time::Duration;

#[test]
fn halfway_is_halfway() {
    let i = interpolate(0.0, 1.0, 500.0, 1.0);
    assert!((i.value - 0.5).abs() < 1e-6);
    assert!(!i.done);
}

#[test]
fn reaching_the_end_is_exact_and_done() {
    let i = interpolate(0.0, 1.0, 1000.0, 1.0);
    assert_eq!(i.value, 1.0);
    assert!(i.done);
}

#[test]
fn overshoot_is_clamped() {
    let i = interpolate(0.0, 1.0, 5000.0, 1.0);
    assert_eq!(i.value, 1.0);
    assert!(i.done);
    let i = interpolate(1.0, 0.0, 5000.0, 1.0);
    assert_eq!(i.value, 0.0);
}

#[test]
fn descending_interpolation() {
    let i = interpolate(1.0, 0.0, 250.0, 1.0);
    assert!((i.value - 0.75).abs() < 1e-6);
}

#[test]
fn degenerate_inputs() {
    let zero = interpolate(0.0, 1.0, 0.0, 0.0);
    assert_eq!(zero.value, 1.0);
    assert!(zero.done, "zero duration completes immediately");

    let negative = interpolate(0.0, 1.0, -100.0, 1.0);
    assert_eq!(negative.value, 0.0);
    assert!(!negative.done);

    let nan = interpolate(0.0, 1.0, f64::NAN, 1.0);
    assert_eq!(nan.value, 0.0);
    assert!(!nan.done);
}

#[test]
fn tween_accumulates_frame_deltas() {
    let mut t = Tween::new(0.0, 1.0, Duration::from_secs(1));
    let step = t.advance(Duration::from_millis(250));
    assert!((step.value - 0.25).abs() < 1e-6);
    let step = t.advance(Duration::from_millis(250));
    assert!((step.value - 0.5).abs() < 1e-6);
    assert_eq!(t.elapsed(), Duration::from_millis(500));

    let step = t.advance(Duration::from_secs(10));
    assert!(step.done);
    assert_eq!(step.value, t.target());
    // stays settled
    assert_eq!(t.advance(Duration::from_millis(16)).value, 1.0);
}

proptest! {
    #[test]
    fn value_stays_between_endpoints(
        from in -10.0f32..10.0,
        to in -10.0f32..10.0,
        elapsed_ms in -1e9f64..1e9,
        duration_sec in 0.0f64..10.0,
    ) {
        let i = interpolate(from, to, elapsed_ms, duration_sec);
        prop_assert!(
            i.value >= from.min(to) && i.value <= from.max(to),
            "{} outside {}..{}",
            i.value,
            from,
            to
        );
        if i.done {
            prop_assert_eq!(i.value, to);
        }
    }
}
