//! Rigid poses as reported by the tracking API.

use glam::{Mat4, Quat, Vec3};

/// Position + orientation, no scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RigidTransform {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl RigidTransform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation: orientation.normalize(),
        }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }

    /// Decompose a column-major 4x4 matrix (the layout XR poses use).
    ///
    /// Any scale in the matrix is dropped. Returns `None` for matrices with
    /// non-finite entries or a degenerate rotation.
    pub fn from_cols_array(m: &[f32; 16]) -> Option<Self> {
        if m.iter().any(|v| !v.is_finite()) {
            return None;
        }
        let (scale, rotation, translation) = Mat4::from_cols_array(m).to_scale_rotation_translation();
        if scale.min_element().abs() <= f32::EPSILON || !rotation.is_finite() {
            return None;
        }
        Some(Self::new(translation, rotation))
    }

    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position)
    }
}

/// One frame's hit-test result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitSample {
    pub transform: RigidTransform,
    pub valid: bool,
}

impl HitSample {
    pub fn hit(transform: RigidTransform) -> Self {
        Self {
            transform,
            valid: true,
        }
    }

    /// Tracking ran this frame but no surface was found.
    pub fn miss() -> Self {
        Self {
            transform: RigidTransform::IDENTITY,
            valid: false,
        }
    }
}
