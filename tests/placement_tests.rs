use ar_core::constants::{MAX_SCALE, MIN_SCALE, PLACEMENT_LIFT};
use ar_core::{
    ContentLayout, ContentLayoutConfig, HitSample, PlacementController, PlacementMode,
    RigidTransform,
};
use glam::{Mat4, Quat, Vec3};
use proptest::prelude::*;

fn hit_at(x: f32, y: f32, z: f32) -> HitSample {
    HitSample::hit(RigidTransform::from_position(Vec3::new(x, y, z)))
}

fn placed() -> PlacementController {
    let mut p = PlacementController::default();
    p.on_hit_sample(&hit_at(0.0, 0.0, -1.0));
    assert!(p.confirm(Some((1920, 1080))));
    p
}

#[test]
fn confirm_without_a_hit_does_nothing() {
    let mut p = PlacementController::default();
    assert!(!p.confirm(None));
    assert_eq!(p.mode(), PlacementMode::Unplaced);
    assert!(p.root_transform().is_none());

    p.on_hit_sample(&HitSample::miss());
    assert!(!p.has_candidate(), "a miss is not a candidate");
    assert!(!p.confirm(None));
}

#[test]
fn confirm_anchors_at_the_latest_hit() {
    let mut p = PlacementController::default();
    p.on_hit_sample(&hit_at(1.0, 0.0, -2.0));
    p.on_hit_sample(&hit_at(0.5, 0.2, -1.0));
    p.on_hit_sample(&HitSample::miss());
    assert!(p.confirm(None));

    let state = p.state();
    assert_eq!(state.mode, PlacementMode::Placed);
    assert_eq!(state.transform.map(|t| t.position), Some(Vec3::new(0.5, 0.2, -1.0)));

    let (_, _, t) = p
        .root_transform()
        .expect("placed")
        .to_scale_rotation_translation();
    assert!(t.abs_diff_eq(Vec3::new(0.5, 0.2 + PLACEMENT_LIFT, -1.0), 1e-6));
}

#[test]
fn gestures_are_ignored_until_placed() {
    let mut p = PlacementController::default();
    p.apply_scale_gesture(2.0);
    p.apply_rotation_gesture(1.0);
    assert_eq!(p.effective_scale(), 1.0);
    assert_eq!(p.yaw(), 0.0);
}

#[test]
fn pinch_scale_is_clamped() {
    let mut p = placed();
    p.apply_scale_gesture(1.5);
    assert!((p.effective_scale() - 1.5).abs() < 1e-6);
    p.apply_scale_gesture(100.0);
    assert_eq!(p.effective_scale(), MAX_SCALE);
    p.apply_scale_gesture(0.0);
    assert_eq!(p.effective_scale(), MIN_SCALE);
    p.apply_scale_gesture(f32::NAN);
    assert_eq!(p.effective_scale(), MIN_SCALE, "NaN leaves the scale alone");

    let (scale, _, _) = p.root_transform().expect("placed").to_scale_rotation_translation();
    assert!(scale.abs_diff_eq(Vec3::splat(MIN_SCALE), 1e-5));
}

#[test]
fn twist_accumulates_yaw() {
    let mut p = placed();
    p.apply_rotation_gesture(0.5);
    p.apply_rotation_gesture(0.25);
    p.apply_rotation_gesture(f32::INFINITY);
    assert!((p.yaw() - 0.75).abs() < 1e-6);

    let (_, rotation, _) = p.root_transform().expect("placed").to_scale_rotation_translation();
    assert!(rotation.abs_diff_eq(Quat::from_rotation_y(0.75), 1e-5));
}

#[test]
fn moving_keeps_scale_and_rotation() {
    let mut p = placed();
    p.apply_scale_gesture(2.0);
    p.apply_rotation_gesture(1.0);
    p.on_hit_sample(&hit_at(3.0, 0.0, -3.0));
    assert!(p.confirm(None));
    assert_eq!(p.anchor().map(|a| a.position), Some(Vec3::new(3.0, 0.0, -3.0)));
    assert!((p.effective_scale() - 2.0).abs() < 1e-6);
    assert!((p.yaw() - 1.0).abs() < 1e-6);
}

#[test]
fn reset_then_place_starts_fresh_at_the_old_candidate() {
    let mut p = placed();
    p.apply_scale_gesture(2.0);
    p.apply_rotation_gesture(1.0);
    p.reset();
    assert_eq!(p.mode(), PlacementMode::Unplaced);
    assert!(p.has_candidate());

    assert!(p.confirm(None));
    assert_eq!(p.effective_scale(), 1.0);
    assert_eq!(p.yaw(), 0.0);
}

#[test]
fn clear_forgets_candidate_and_layout() {
    let mut p = placed();
    p.clear();
    assert!(!p.has_candidate());
    assert!(p.layout().is_none());
    assert!(!p.confirm(None));
}

#[test]
fn layout_follows_video_aspect() {
    let cfg = ContentLayoutConfig::default();
    let landscape = ContentLayout::from_video_size(&cfg, Some((1920, 1080)));
    assert!((landscape.video_size.x - 0.8).abs() < 1e-6);
    assert!((landscape.video_size.y - 0.45).abs() < 1e-6);
    assert!((landscape.shadow_size.x - 0.92).abs() < 1e-6);
    assert!((landscape.shadow_size.y - 0.3375).abs() < 1e-6);

    let unknown = ContentLayout::from_video_size(&cfg, None);
    assert!((unknown.video_size.y - 0.45).abs() < 1e-6, "falls back to 16:9");
    let zero = ContentLayout::from_video_size(&cfg, Some((0, 720)));
    assert_eq!(zero.video_size, unknown.video_size);

    let portrait = ContentLayout::from_video_size(&cfg, Some((1080, 1920)));
    assert!((portrait.video_size.y - 0.8 * 1920.0 / 1080.0).abs() < 1e-5);
}

#[test]
fn layout_is_fixed_at_first_confirm() {
    let mut p = placed();
    p.on_hit_sample(&hit_at(1.0, 0.0, -1.0));
    p.confirm(Some((1000, 1000)));
    let layout = p.layout().expect("laid out");
    assert!((layout.video_size.y - 0.45).abs() < 1e-6);
}

#[test]
fn video_stands_on_the_floor() {
    let layout = ContentLayout::from_video_size(&ContentLayoutConfig::default(), Some((1920, 1080)));
    let m = layout.video_model(Mat4::IDENTITY);
    let bottom = m.transform_point3(Vec3::new(0.0, -0.5, 0.0));
    let top = m.transform_point3(Vec3::new(0.0, 0.5, 0.0));
    assert!(bottom.abs_diff_eq(Vec3::ZERO, 1e-6));
    assert!(top.abs_diff_eq(Vec3::new(0.0, 0.45, 0.0), 1e-6));
}

#[test]
fn shadow_lies_flat_just_above_the_floor() {
    let layout = ContentLayout::from_video_size(&ContentLayoutConfig::default(), Some((1920, 1080)));
    let m = layout.shadow_model(Mat4::IDENTITY);
    for corner in [
        Vec3::new(-0.5, -0.5, 0.0),
        Vec3::new(0.5, -0.5, 0.0),
        Vec3::new(0.5, 0.5, 0.0),
    ] {
        let p = m.transform_point3(corner);
        assert!((p.y - layout.shadow_lift).abs() < 1e-6, "corner at {:?}", p);
    }
    let far = m.transform_point3(Vec3::new(0.5, 0.5, 0.0));
    assert!((far.x - 0.46).abs() < 1e-6);
    assert!((far.z.abs() - 0.16875).abs() < 1e-6);
}

#[test]
fn point_cloud_sits_behind_at_half_scale() {
    let layout = ContentLayout::from_video_size(&ContentLayoutConfig::default(), None);
    let m = layout.point_cloud_model(Mat4::IDENTITY);
    assert!(m
        .transform_point3(Vec3::ZERO)
        .abs_diff_eq(Vec3::new(0.0, 0.0, -0.2), 1e-6));
    assert!(m
        .transform_point3(Vec3::X)
        .abs_diff_eq(Vec3::new(0.5, 0.0, -0.2), 1e-6));
}

proptest! {
    #[test]
    fn effective_scale_stays_clamped(
        multipliers in prop::collection::vec(-1e6f32..1e6, 1..8),
    ) {
        let mut p = placed();
        for m in multipliers {
            p.apply_scale_gesture(m);
            let s = p.effective_scale();
            prop_assert!((MIN_SCALE..=MAX_SCALE).contains(&s), "scale {} after x{}", s, m);
        }
    }
}
