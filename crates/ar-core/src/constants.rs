// Tuning constants shared by the core controllers and the web front-end.

// Chroma key (values match the greenscreen footage shipped in assets/)
pub const KEY_COLOR: [f32; 3] = [0.133_333_34, 0.729_411_8, 0.180_392_16];
pub const SIMILARITY: f32 = 0.23;
pub const SMOOTHNESS: f32 = 0.07;
pub const SPILL: f32 = 0.10;
pub const SPILL_GAIN: f32 = 4.0; // desaturation = (g - max(r, b)) * spill * gain
pub const KEY_DISCARD_ALPHA: f32 = 0.02; // fragments below this alpha are dropped

// Placement
pub const MIN_SCALE: f32 = 0.3;
pub const MAX_SCALE: f32 = 3.0;
pub const PLACEMENT_LIFT: f32 = 0.01; // raise the root off the detected surface

// Content layout (world units)
pub const CONTENT_WIDTH: f32 = 0.8;
pub const DEFAULT_ASPECT: f32 = 16.0 / 9.0;
pub const SHADOW_WIDTH_RATIO: f32 = 1.15;
pub const SHADOW_HEIGHT_RATIO: f32 = 0.75;
pub const SHADOW_LIFT: f32 = 0.001;
pub const POINT_CLOUD_OFFSET: [f32; 3] = [0.0, 0.0, -0.2];
pub const POINT_CLOUD_SCALE: f32 = 0.5;

// Oval contact shadow
pub const SHADOW_HALF_AXES: [f32; 2] = [0.95, 0.6];
pub const SHADOW_EXPONENT: f32 = 1.5;
pub const SHADOW_OPACITY: f32 = 0.85;
pub const SHADOW_DISCARD_ALPHA: f32 = 0.001;

// Point-cloud reveal timing (seconds unless noted)
pub const REVEAL_FRACTION: f64 = 0.5; // fade in at d * 0.5
pub const CONCEAL_FRACTION: f64 = 0.8; // fade out at max(d - lead, d * 0.8)
pub const CONCEAL_LEAD_SEC: f64 = 5.0;
pub const FADE_DURATION_SEC: f64 = 1.0;
pub const REWIND_THRESHOLD_SEC: f64 = 1.0; // t below this counts as a loop restart
pub const MIN_REVEAL_SEC: f64 = 1.5; // keeps the reveal point clear of the rewind window

// Reticle
pub const RETICLE_OPACITY_HIT: f32 = 1.0;
pub const RETICLE_OPACITY_SEARCHING: f32 = 0.3;

// UI labels
pub const LABEL_ENTER_AR: &str = "Start AR";
pub const LABEL_AR_FAILED: &str = "AR failed (use HTTPS + AR browser)";
pub const LABEL_PLAY: &str = "▶︎ Play Video";
pub const LABEL_PAUSE: &str = "⏸ Pause";

// Media assets
pub const VIDEO_SRC: &str = "./assets/greenscreen.mp4";
pub const PLY_SRC: &str = "./assets/splat.ply";
