//! Soft oval contact shadow under the placed content.
//!
//! CPU mirror of `shaders/shadow.frag`.

use crate::chroma::smoothstep;
use crate::constants::*;
use glam::Vec2;

#[derive(Clone, Debug, PartialEq)]
pub struct OvalShadowParams {
    /// Ellipse half-axes in the quad's \[-1, 1\] space.
    pub half_axes: Vec2,
    pub exponent: f32,
    pub opacity: f32,
}

impl Default for OvalShadowParams {
    fn default() -> Self {
        Self {
            half_axes: Vec2::from_array(SHADOW_HALF_AXES),
            exponent: SHADOW_EXPONENT,
            opacity: SHADOW_OPACITY,
        }
    }
}

impl OvalShadowParams {
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Shadow alpha at a quad uv in \[0, 1\]². `None` where the fragment is dropped.
    pub fn alpha_at(&self, uv: Vec2) -> Option<f32> {
        let p = uv * 2.0 - Vec2::ONE;
        let q = p / self.half_axes;
        let rr = q.length_squared();
        let a = (1.0 - smoothstep(0.0, 1.0, rr)).powf(self.exponent);
        let alpha = a * self.opacity;
        (alpha > SHADOW_DISCARD_ALPHA).then_some(alpha)
    }
}
