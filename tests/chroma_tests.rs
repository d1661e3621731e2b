use ar_core::constants::{KEY_COLOR, KEY_DISCARD_ALPHA};
use ar_core::{composite, key_alpha, smoothstep, suppress_spill, ChromaKeyParams, ConfigError};
use glam::Vec3;
use proptest::prelude::*;

fn key() -> Vec3 {
    Vec3::from_array(KEY_COLOR)
}

#[test]
fn key_colour_is_discarded() {
    let params = ChromaKeyParams::default();
    assert_eq!(key_alpha(key(), &params), 0.0);
    assert!(composite(key(), &params).is_none());
}

#[test]
fn far_colour_is_opaque_and_unchanged_without_spill() {
    let params = ChromaKeyParams::default();
    let red = Vec3::new(1.0, 0.0, 0.0);
    let px = composite(red, &params).expect("red survives keying");
    assert_eq!(px.alpha, 1.0);
    assert!(px.color.abs_diff_eq(red, 1e-6), "no green excess, no spill change");
}

#[test]
fn green_spill_is_pulled_toward_grey() {
    let params = ChromaKeyParams::default();
    let sample = Vec3::new(0.4, 0.9, 0.4);
    let px = composite(sample, &params).expect("far from key");
    // excess 0.5 * spill 0.1 * gain 4 = 0.2 of the way to grey 0.4
    assert!((px.color.y - 0.8).abs() < 1e-5, "green was {}", px.color.y);
    assert!((px.color.x - 0.4).abs() < 1e-6);
    assert!((px.color.z - 0.4).abs() < 1e-6);
}

#[test]
fn edge_of_key_region_is_partially_transparent() {
    let params = ChromaKeyParams::default();
    let (e0, e1) = params.edges();
    let mid = (e0 + e1) * 0.5;
    let sample = key() + Vec3::new(mid, 0.0, 0.0);
    let a = key_alpha(sample, &params);
    assert!(a > 0.3 && a < 0.7, "alpha {} should be near 0.5", a);
}

#[test]
fn zero_smoothness_is_a_hard_step() {
    let params = ChromaKeyParams::new(key(), 0.23, 0.0, 0.1).expect("valid");
    let inside = key() + Vec3::new(0.229, 0.0, 0.0);
    let outside = key() + Vec3::new(0.231, 0.0, 0.0);
    assert_eq!(key_alpha(inside, &params), 0.0);
    assert_eq!(key_alpha(outside, &params), 1.0);
}

#[test]
fn smoothstep_matches_glsl_at_the_edges() {
    assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
    assert_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
    assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
    assert_eq!(smoothstep(1.0, 1.0, 0.99), 0.0);
    assert_eq!(smoothstep(1.0, 1.0, 1.0), 1.0);
}

#[test]
fn invalid_parameters_are_rejected() {
    assert_eq!(
        ChromaKeyParams::new(key(), 0.0, 0.0, 0.1),
        Err(ConfigError::Similarity(0.0))
    );
    assert!(matches!(
        ChromaKeyParams::new(key(), 0.2, 0.3, 0.1),
        Err(ConfigError::Smoothness { .. })
    ));
    assert_eq!(
        ChromaKeyParams::new(key(), 0.2, 0.1, -1.0),
        Err(ConfigError::Spill(-1.0))
    );
    assert_eq!(
        ChromaKeyParams::new(Vec3::new(f32::NAN, 0.0, 0.0), 0.2, 0.1, 0.1),
        Err(ConfigError::KeyColor)
    );
}

#[test]
fn premultiplied_scales_colour_by_alpha() {
    let params = ChromaKeyParams::default();
    let (e0, e1) = params.edges();
    let sample = key() + Vec3::new((e0 + e1) * 0.5, 0.0, 0.0);
    let px = composite(sample, &params).expect("partially keyed");
    let [r, g, b, a] = px.premultiplied();
    assert_eq!(a, px.alpha);
    assert!((r - px.color.x * a).abs() < 1e-6);
    assert!((g - px.color.y * a).abs() < 1e-6);
    assert!((b - px.color.z * a).abs() < 1e-6);
}

fn unit_rgb() -> impl Strategy<Value = Vec3> {
    (0.0f32..=1.0, 0.0f32..=1.0, 0.0f32..=1.0).prop_map(|(r, g, b)| Vec3::new(r, g, b))
}

proptest! {
    #[test]
    fn alpha_stays_in_unit_range(sample in unit_rgb()) {
        let a = key_alpha(sample, &ChromaKeyParams::default());
        prop_assert!((0.0..=1.0).contains(&a));
    }

    #[test]
    fn discard_happens_exactly_below_threshold(sample in unit_rgb()) {
        let params = ChromaKeyParams::default();
        let a = key_alpha(sample, &params);
        prop_assert_eq!(composite(sample, &params).is_none(), a < KEY_DISCARD_ALPHA);
    }

    #[test]
    fn alpha_grows_with_distance_from_key(
        dir in (-1.0f32..1.0, -1.0f32..1.0, -1.0f32..1.0),
        d1 in 0.0f32..0.5,
        d2 in 0.0f32..0.5,
    ) {
        let dir = Vec3::new(dir.0, dir.1, dir.2);
        prop_assume!(dir.length() > 1e-3);
        let dir = dir.normalize();
        let params = ChromaKeyParams::default();
        let (near, far) = if d1 <= d2 { (d1, d2) } else { (d2, d1) };
        let a_near = key_alpha(key() + dir * near, &params);
        let a_far = key_alpha(key() + dir * far, &params);
        prop_assert!(a_near <= a_far + 1e-6, "{} > {}", a_near, a_far);
    }

    #[test]
    fn spill_never_brightens_green(sample in unit_rgb()) {
        let out = suppress_spill(sample, 0.1);
        prop_assert!(out.y <= sample.y + 1e-6);
        prop_assert!(out.x.is_finite() && out.y.is_finite() && out.z.is_finite());
    }
}

fn axis(i: usize) -> Vec3 {
    [Vec3::X, Vec3::Y, Vec3::Z][i]
}

// (similarity, smoothness) with 0 < smoothness <= min(similarity, 1)
fn key_params() -> impl Strategy<Value = ChromaKeyParams> {
    (0.05f32..=2.0, 0.01f32..=1.0).prop_map(|(similarity, frac)| {
        let smoothness = frac * similarity.min(1.0);
        ChromaKeyParams::new(Vec3::ZERO, similarity, smoothness, 0.1)
            .expect("valid by construction")
    })
}

proptest! {
    #[test]
    fn alpha_is_zero_at_the_inner_edge(params in key_params(), i in 0usize..3) {
        let (e0, _) = params.edges();
        prop_assert_eq!(key_alpha(axis(i) * e0, &params), 0.0);
    }

    #[test]
    fn alpha_is_one_beyond_similarity(
        params in key_params(),
        i in 0usize..3,
        extra in 0.0f32..2.0,
    ) {
        let (_, e1) = params.edges();
        prop_assert_eq!(key_alpha(axis(i) * (e1 + extra), &params), 1.0);
    }
}
