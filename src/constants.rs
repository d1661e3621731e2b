// DOM ids (see index.html)
pub const CANVAS_ID: &str = "xr-canvas";
pub const ENTER_AR_ID: &str = "enterAR";
pub const PLAY_BUTTON_ID: &str = "playBtn";
pub const RESET_BUTTON_ID: &str = "resetBtn";
pub const INSTRUCTIONS_ID: &str = "instructions";
pub const PLACE_HINT_ID: &str = "placeHint";
pub const RETICLE_ID: &str = "reticle";
pub const OVERLAY_ROOT_ID: &str = "overlay";
pub const HIDDEN_CLASS: &str = "hidden";

// WebXR session
pub const XR_SESSION_MODE: &str = "immersive-ar";
pub const XR_REQUIRED_FEATURES: [&str; 2] = ["hit-test", "local-floor"];
pub const XR_OPTIONAL_FEATURES: [&str; 1] = ["dom-overlay"];
pub const XR_REFERENCE_SPACE: &str = "local-floor";
pub const XR_VIEWER_SPACE: &str = "viewer";

// Gestures (CSS pixels)
pub const TAP_MAX_TRAVEL_PX: f32 = 12.0; // farther than this is a drag, not a tap
pub const PINCH_MIN_DISTANCE_PX: f32 = 8.0; // fingers closer than this give no usable ratio

// Rendering
pub const POINT_SIZE_PX: f32 = 2.0;
pub const VIDEO_HAVE_CURRENT_DATA: u16 = 2; // HTMLMediaElement.HAVE_CURRENT_DATA
pub const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 0.0]; // passthrough camera shows through
