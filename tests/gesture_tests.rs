// Host-side tests for the gesture recogniser.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}

use glam::Vec2;
use input::*;
use std::f32::consts::{FRAC_PI_2, PI};

fn tracker() -> GestureTracker {
    GestureTracker::new(12.0, 8.0)
}

#[test]
fn short_press_is_a_tap() {
    let mut g = tracker();
    g.pointer_down(1, Vec2::new(100.0, 200.0));
    assert!(g.pointer_move(1, Vec2::new(103.0, 204.0)).is_empty());
    assert_eq!(
        g.pointer_up(1, Vec2::new(103.0, 204.0)),
        Some(GestureEvent::Tap(Vec2::new(103.0, 204.0)))
    );
    assert_eq!(g.active_pointers(), 0);
}

#[test]
fn drag_is_not_a_tap() {
    let mut g = tracker();
    g.pointer_down(1, Vec2::ZERO);
    g.pointer_move(1, Vec2::new(40.0, 0.0));
    // coming back does not make it a tap again
    g.pointer_move(1, Vec2::new(1.0, 0.0));
    assert_eq!(g.pointer_up(1, Vec2::new(1.0, 0.0)), None);
}

#[test]
fn pinch_reports_scale_relative_to_its_start() {
    let mut g = tracker();
    g.pointer_down(1, Vec2::new(100.0, 100.0));
    g.pointer_down(2, Vec2::new(200.0, 100.0));
    assert!(g.is_pinching());

    let events = g.pointer_move(2, Vec2::new(300.0, 100.0));
    assert_eq!(events.first(), Some(&GestureEvent::Scale(2.0)));
    let events = g.pointer_move(2, Vec2::new(150.0, 100.0));
    assert_eq!(events.first(), Some(&GestureEvent::Scale(0.5)));
}

#[test]
fn twist_reports_yaw_deltas() {
    let mut g = tracker();
    g.pointer_down(1, Vec2::new(0.0, 0.0));
    g.pointer_down(2, Vec2::new(100.0, 0.0));
    // second finger swings clockwise on screen (y points down)
    let events = g.pointer_move(2, Vec2::new(0.0, 100.0));
    let rotate = events
        .iter()
        .find_map(|e| match e {
            GestureEvent::Rotate(r) => Some(*r),
            _ => None,
        })
        .expect("rotation reported");
    assert!(
        (rotate + FRAC_PI_2).abs() < 1e-5,
        "clockwise twist turns negative yaw, got {}",
        rotate
    );

    // unchanged angle reports no rotation
    let events = g.pointer_move(1, Vec2::new(0.0, 0.0));
    assert!(!events.iter().any(|e| matches!(e, GestureEvent::Rotate(_))));
}

#[test]
fn twist_across_the_seam_takes_the_short_way() {
    let mut g = tracker();
    g.pointer_down(1, Vec2::ZERO);
    // just below the negative x axis (screen), angle close to -π
    g.pointer_down(2, Vec2::new(-100.0, -1.0));
    // just above it, angle close to +π
    let events = g.pointer_move(2, Vec2::new(-100.0, 1.0));
    let rotate = events
        .iter()
        .find_map(|e| match e {
            GestureEvent::Rotate(r) => Some(*r),
            _ => None,
        })
        .expect("rotation reported");
    assert!(rotate.abs() < 0.05, "expected a tiny step, got {}", rotate);
}

#[test]
fn lifting_a_finger_ends_the_pinch_without_a_tap() {
    let mut g = tracker();
    g.pointer_down(1, Vec2::ZERO);
    g.pointer_down(2, Vec2::new(50.0, 0.0));
    assert_eq!(g.pointer_up(2, Vec2::new(50.0, 0.0)), None);
    assert!(!g.is_pinching());
    assert_eq!(g.pointer_up(1, Vec2::ZERO), None, "two-finger touch is never a tap");
}

#[test]
fn third_finger_is_ignored() {
    let mut g = tracker();
    g.pointer_down(1, Vec2::ZERO);
    g.pointer_down(2, Vec2::new(100.0, 0.0));
    g.pointer_down(3, Vec2::new(50.0, 50.0));
    assert_eq!(g.active_pointers(), 2);
    assert!(g.pointer_move(3, Vec2::new(80.0, 80.0)).is_empty());
}

#[test]
fn cancel_drops_the_pointer() {
    let mut g = tracker();
    g.pointer_down(1, Vec2::ZERO);
    g.pointer_cancel(1);
    assert_eq!(g.active_pointers(), 0);
    assert_eq!(g.pointer_up(1, Vec2::ZERO), None);
}

#[test]
fn fingers_too_close_give_no_scale() {
    let mut g = tracker();
    g.pointer_down(1, Vec2::ZERO);
    g.pointer_down(2, Vec2::new(2.0, 0.0));
    let events = g.pointer_move(2, Vec2::new(50.0, 0.0));
    assert!(!events.iter().any(|e| matches!(e, GestureEvent::Scale(_))));
}

#[test]
fn wrap_angle_range() {
    assert_eq!(wrap_angle(0.0), 0.0);
    assert!((wrap_angle(2.5 * PI) - 0.5 * PI).abs() < 1e-5);
    assert!((wrap_angle(1.5 * PI) + 0.5 * PI).abs() < 1e-5);
    assert!((wrap_angle(-PI + 0.1) - (-PI + 0.1)).abs() < 1e-5);
    assert!((wrap_angle(PI - 0.1) - (PI - 0.1)).abs() < 1e-5);
    assert_eq!(wrap_angle(f32::NAN), 0.0);
}

#[test]
fn overlay_sessions_place_from_pointer_taps_only() {
    let source = TapSource::for_session(true);
    assert!(source.pointer_taps_confirm());
    assert!(!source.select_confirms(), "select would repeat the pointer tap");

    let source = TapSource::for_session(false);
    assert!(source.select_confirms());
    assert!(!source.pointer_taps_confirm());

    assert_eq!(TapSource::default(), TapSource::Pointer);
}

#[test]
fn releasing_a_pinch_never_taps() {
    let mut g = tracker();
    g.pointer_down(1, Vec2::new(100.0, 100.0));
    g.pointer_down(2, Vec2::new(200.0, 100.0));
    assert!(g.is_pinching());
    g.pointer_move(2, Vec2::new(260.0, 100.0));
    // both fingers lift where they are; neither release may place content
    assert_eq!(g.pointer_up(2, Vec2::new(260.0, 100.0)), None);
    assert_eq!(g.pointer_up(1, Vec2::new(100.0, 100.0)), None);
    assert!(!g.is_pinching());
}
