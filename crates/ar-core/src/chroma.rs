//! Chroma-key model.
//!
//! This is the reference for `shaders/chroma.frag`, which runs the same
//! math per fragment on the GPU. Keep the two in step.

use crate::constants::*;
use crate::error::ConfigError;
use glam::Vec3;

/// Key colour and thresholds, fixed for the session.
#[derive(Clone, Debug, PartialEq)]
pub struct ChromaKeyParams {
    key_color: Vec3,
    similarity: f32,
    smoothness: f32,
    spill: f32,
}

impl Default for ChromaKeyParams {
    fn default() -> Self {
        Self {
            key_color: Vec3::from_array(KEY_COLOR),
            similarity: SIMILARITY,
            smoothness: SMOOTHNESS,
            spill: SPILL,
        }
    }
}

impl ChromaKeyParams {
    /// Requires `similarity > 0` and `0 <= smoothness <= similarity`.
    pub fn new(
        key_color: Vec3,
        similarity: f32,
        smoothness: f32,
        spill: f32,
    ) -> Result<Self, ConfigError> {
        if !key_color.is_finite() {
            return Err(ConfigError::KeyColor);
        }
        if !similarity.is_finite() || similarity <= 0.0 {
            return Err(ConfigError::Similarity(similarity));
        }
        if !smoothness.is_finite() || smoothness < 0.0 || smoothness > similarity {
            return Err(ConfigError::Smoothness {
                smoothness,
                similarity,
            });
        }
        if !spill.is_finite() || spill < 0.0 {
            return Err(ConfigError::Spill(spill));
        }
        Ok(Self {
            key_color,
            similarity,
            smoothness,
            spill,
        })
    }

    pub fn key_color(&self) -> Vec3 {
        self.key_color
    }

    pub fn similarity(&self) -> f32 {
        self.similarity
    }

    pub fn smoothness(&self) -> f32 {
        self.smoothness
    }

    pub fn spill(&self) -> f32 {
        self.spill
    }

    /// Distances at which alpha starts and finishes ramping up.
    pub fn edges(&self) -> (f32, f32) {
        (self.similarity * (1.0 - self.smoothness), self.similarity)
    }
}

/// Cubic Hermite smoothstep, as in GLSL.
///
/// For a degenerate range (`edge1 <= edge0`) this is a hard step at `edge1`.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x < edge1 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Alpha for a sample: 0 inside the key region, 1 well outside it.
#[inline]
pub fn key_alpha(sample: Vec3, params: &ChromaKeyParams) -> f32 {
    let (edge0, edge1) = params.edges();
    smoothstep(edge0, edge1, sample.distance(params.key_color))
}

/// Pull green-dominant samples toward the red/blue grey.
#[inline]
pub fn suppress_spill(sample: Vec3, spill: f32) -> Vec3 {
    let desaturation = ((sample.y - sample.x.max(sample.z)) * spill * SPILL_GAIN).clamp(0.0, 1.0);
    let grey = Vec3::splat((sample.x + sample.z) * 0.5);
    sample.lerp(grey, desaturation)
}

/// A keyed output fragment, straight (non-premultiplied) alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyedPixel {
    pub color: Vec3,
    pub alpha: f32,
}

impl KeyedPixel {
    pub fn premultiplied(&self) -> [f32; 4] {
        let c = self.color * self.alpha;
        [c.x, c.y, c.z, self.alpha]
    }
}

/// Key one RGB sample. `None` means the fragment is discarded.
pub fn composite(sample: Vec3, params: &ChromaKeyParams) -> Option<KeyedPixel> {
    let alpha = key_alpha(sample, params);
    if alpha < KEY_DISCARD_ALPHA {
        return None;
    }
    Some(KeyedPixel {
        color: suppress_spill(sample, params.spill),
        alpha,
    })
}
