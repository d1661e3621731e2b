//! Placement of the content group onto a hit-tested surface.

use crate::constants::*;
use crate::pose::{HitSample, RigidTransform};
use glam::{Mat4, Quat, Vec2, Vec3};

/// Sizing rules for the placed content.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentLayoutConfig {
    pub width: f32,
    pub default_aspect: f32,
    pub shadow_width_ratio: f32,
    pub shadow_height_ratio: f32,
    pub shadow_lift: f32,
    pub point_cloud_offset: Vec3,
    pub point_cloud_scale: f32,
}

impl Default for ContentLayoutConfig {
    fn default() -> Self {
        Self {
            width: CONTENT_WIDTH,
            default_aspect: DEFAULT_ASPECT,
            shadow_width_ratio: SHADOW_WIDTH_RATIO,
            shadow_height_ratio: SHADOW_HEIGHT_RATIO,
            shadow_lift: SHADOW_LIFT,
            point_cloud_offset: Vec3::from_array(POINT_CLOUD_OFFSET),
            point_cloud_scale: POINT_CLOUD_SCALE,
        }
    }
}

/// Concrete plane sizes, fixed at the first confirm of a session.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentLayout {
    pub video_size: Vec2,
    pub shadow_size: Vec2,
    pub shadow_lift: f32,
    pub point_cloud_offset: Vec3,
    pub point_cloud_scale: f32,
}

impl ContentLayout {
    /// Size the video plane from the clip's intrinsic pixel size.
    ///
    /// Falls back to the default aspect when the size is unknown or zero.
    pub fn from_video_size(config: &ContentLayoutConfig, video_size: Option<(u32, u32)>) -> Self {
        let aspect = match video_size {
            Some((w, h)) if w > 0 && h > 0 => w as f32 / h as f32,
            _ => config.default_aspect,
        };
        let width = config.width;
        let height = width / aspect;
        Self {
            video_size: Vec2::new(width, height),
            shadow_size: Vec2::new(
                width * config.shadow_width_ratio,
                height * config.shadow_height_ratio,
            ),
            shadow_lift: config.shadow_lift,
            point_cloud_offset: config.point_cloud_offset,
            point_cloud_scale: config.point_cloud_scale,
        }
    }

    /// Model matrix of the unit video quad (centred, spanning ±0.5), standing on the floor.
    pub fn video_model(&self, root: Mat4) -> Mat4 {
        root * Mat4::from_scale_rotation_translation(
            self.video_size.extend(1.0),
            Quat::IDENTITY,
            Vec3::new(0.0, self.video_size.y * 0.5, 0.0),
        )
    }

    /// Model matrix of the unit shadow quad, lying flat just above the floor.
    pub fn shadow_model(&self, root: Mat4) -> Mat4 {
        root * Mat4::from_scale_rotation_translation(
            self.shadow_size.extend(1.0),
            Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2),
            Vec3::new(0.0, self.shadow_lift, 0.0),
        )
    }

    pub fn point_cloud_model(&self, root: Mat4) -> Mat4 {
        root * Mat4::from_scale_rotation_translation(
            Vec3::splat(self.point_cloud_scale),
            Quat::IDENTITY,
            self.point_cloud_offset,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlacementMode {
    Unplaced,
    Placed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Placement {
    Unplaced,
    Placed { anchor: RigidTransform },
}

/// Read-only snapshot of the placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementState {
    pub mode: PlacementMode,
    /// Defined only while placed.
    pub transform: Option<RigidTransform>,
    pub user_scale_factor: f32,
    pub base_scale: f32,
}

/// Turns a stream of hit samples into one confirmed anchor.
///
/// Every operation is a silent no-op when its precondition is missing (no
/// hit sample yet, nothing placed): placement idles until tracking data
/// arrives.
#[derive(Clone, Debug)]
pub struct PlacementController {
    placement: Placement,
    last_hit: Option<RigidTransform>,
    base_scale: f32,
    user_scale_factor: f32,
    yaw: f32,
    layout: Option<ContentLayout>,
    layout_config: ContentLayoutConfig,
}

impl Default for PlacementController {
    fn default() -> Self {
        Self::new(ContentLayoutConfig::default())
    }
}

impl PlacementController {
    pub fn new(layout_config: ContentLayoutConfig) -> Self {
        Self {
            placement: Placement::Unplaced,
            last_hit: None,
            base_scale: 1.0,
            user_scale_factor: 1.0,
            yaw: 0.0,
            layout: None,
            layout_config,
        }
    }

    /// Remember the latest valid hit as the placement candidate.
    pub fn on_hit_sample(&mut self, sample: &HitSample) {
        if sample.valid {
            self.last_hit = Some(sample.transform);
        }
    }

    /// Place (or move) the content at the latest hit.
    ///
    /// The first confirm also fixes the layout from `video_size`. Moving an
    /// already placed group keeps its scale and rotation. Returns whether
    /// anything changed.
    pub fn confirm(&mut self, video_size: Option<(u32, u32)>) -> bool {
        let Some(anchor) = self.last_hit else {
            return false;
        };
        if self.layout.is_none() {
            let layout = ContentLayout::from_video_size(&self.layout_config, video_size);
            log::info!(
                "[placement] layout {:.3}x{:.3} (video {:?})",
                layout.video_size.x,
                layout.video_size.y,
                video_size
            );
            self.layout = Some(layout);
        }
        match self.placement {
            Placement::Unplaced => {
                self.base_scale = 1.0;
                self.user_scale_factor = 1.0;
                self.yaw = 0.0;
                log::info!(
                    "[placement] placed at ({:.2},{:.2},{:.2})",
                    anchor.position.x,
                    anchor.position.y,
                    anchor.position.z
                );
            }
            Placement::Placed { .. } => {
                log::info!(
                    "[placement] moved to ({:.2},{:.2},{:.2})",
                    anchor.position.x,
                    anchor.position.y,
                    anchor.position.z
                );
            }
        }
        self.placement = Placement::Placed { anchor };
        true
    }

    /// Pinch scale, relative to the gesture's own start.
    pub fn apply_scale_gesture(&mut self, multiplier: f32) {
        if !self.is_placed() || !multiplier.is_finite() {
            return;
        }
        self.user_scale_factor = multiplier;
    }

    /// Twist rotation about the vertical axis, unbounded.
    pub fn apply_rotation_gesture(&mut self, delta_radians: f32) {
        if !self.is_placed() || !delta_radians.is_finite() {
            return;
        }
        self.yaw += delta_radians;
    }

    /// Unplace. The last hit stays available for the next confirm.
    pub fn reset(&mut self) {
        if self.is_placed() {
            log::info!("[placement] reset");
        }
        self.placement = Placement::Unplaced;
    }

    /// Forget everything tied to the current session, including the layout.
    pub fn clear(&mut self) {
        let layout_config = self.layout_config.clone();
        *self = Self::new(layout_config);
    }

    pub fn is_placed(&self) -> bool {
        matches!(self.placement, Placement::Placed { .. })
    }

    pub fn mode(&self) -> PlacementMode {
        match self.placement {
            Placement::Unplaced => PlacementMode::Unplaced,
            Placement::Placed { .. } => PlacementMode::Placed,
        }
    }

    pub fn anchor(&self) -> Option<RigidTransform> {
        match self.placement {
            Placement::Unplaced => None,
            Placement::Placed { anchor } => Some(anchor),
        }
    }

    pub fn last_hit(&self) -> Option<RigidTransform> {
        self.last_hit
    }

    pub fn has_candidate(&self) -> bool {
        self.last_hit.is_some()
    }

    /// Scale actually applied to the group: `base × factor` clamped to
    /// `[MIN_SCALE, MAX_SCALE] × base`.
    pub fn effective_scale(&self) -> f32 {
        (self.base_scale * self.user_scale_factor)
            .clamp(MIN_SCALE * self.base_scale, MAX_SCALE * self.base_scale)
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn layout(&self) -> Option<&ContentLayout> {
        self.layout.as_ref()
    }

    pub fn state(&self) -> PlacementState {
        PlacementState {
            mode: self.mode(),
            transform: self.anchor(),
            user_scale_factor: self.user_scale_factor,
            base_scale: self.base_scale,
        }
    }

    /// World transform of the placed group, `None` while unplaced.
    pub fn root_transform(&self) -> Option<Mat4> {
        let anchor = self.anchor()?;
        let rotation = anchor.orientation * Quat::from_rotation_y(self.yaw);
        let translation = anchor.position + Vec3::Y * PLACEMENT_LIFT;
        Some(Mat4::from_scale_rotation_translation(
            Vec3::splat(self.effective_scale()),
            rotation,
            translation,
        ))
    }
}
