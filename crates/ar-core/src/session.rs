//! Per-session composition of placement, fade, playback and UI state.
//!
//! The orchestrator is owned by the front-end (one per page) and is fed
//! discrete events: session start/end, hit samples, taps, gestures, video
//! time. Once per display refresh [`SessionOrchestrator::tick`] advances
//! timers and hands a [`SceneFrame`] to the renderer.

use crate::chroma::ChromaKeyParams;
use crate::constants::*;
use crate::error::SessionError;
use crate::fade::{ContentFadeController, FadePhase, FadeTiming};
use crate::placement::{ContentLayoutConfig, PlacementController};
use crate::pose::HitSample;
use crate::shadow::OvalShadowParams;
use glam::Mat4;
use std::fmt;
use std::time::Duration;

/// Everything configurable about a session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionConfig {
    pub chroma: ChromaKeyParams,
    pub shadow: OvalShadowParams,
    pub fade: FadeTiming,
    pub layout: ContentLayoutConfig,
}

/// Lifecycle of the tracking handles (reference space, hit-test source).
///
/// `H` is whatever the platform hands back; the core only tracks whether it
/// has been asked for, arrived, or failed.
#[derive(Debug)]
pub enum TrackingHandles<H> {
    Unrequested,
    Requested,
    Ready(H),
    Failed,
}

/// Identifies one AR session, so late async results from an earlier
/// session can be told apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionId(u64);

#[derive(Clone, Debug, PartialEq)]
enum SessionPhase {
    Idle,
    Active,
    Failed(SessionError),
}

/// Media action the front-end should carry out on the video element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackRequest {
    Play,
    Pause,
}

/// Play/pause label state. Only confirmed playback flips it to "playing".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlaybackControl {
    playing: bool,
}

impl PlaybackControl {
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn label(&self) -> &'static str {
        if self.playing {
            LABEL_PAUSE
        } else {
            LABEL_PLAY
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReticleState {
    pub visible: bool,
    pub opacity: f32,
}

/// State mirrored into the DOM controls each frame.
#[derive(Clone, Debug, PartialEq)]
pub struct UiState {
    pub enter_visible: bool,
    pub enter_label: &'static str,
    pub instructions_visible: bool,
    pub place_hint_visible: bool,
    pub play_visible: bool,
    pub play_enabled: bool,
    pub play_label: &'static str,
    pub reset_visible: bool,
    pub reticle: ReticleState,
}

/// The placed group, ready for drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedContent {
    pub root: Mat4,
    pub video_model: Mat4,
    pub shadow_model: Mat4,
    pub point_cloud_model: Mat4,
    /// Point-cloud opacity; only drawn when above zero.
    pub point_cloud_opacity: f32,
    pub point_cloud_phase: FadePhase,
}

impl PlacedContent {
    pub fn draws_point_cloud(&self) -> bool {
        self.point_cloud_opacity > 0.0
    }
}

/// What the renderer should draw this frame.
#[derive(Clone, Debug)]
pub struct SceneFrame<'a> {
    /// `None` while nothing is placed.
    pub content: Option<PlacedContent>,
    pub chroma: &'a ChromaKeyParams,
    pub shadow: &'a OvalShadowParams,
}

/// Draw-call sink implemented by the rendering engine.
pub trait SceneRenderer {
    type Error: fmt::Display;

    fn draw(&mut self, frame: &SceneFrame<'_>) -> Result<(), Self::Error>;
}

/// Owns all per-session state and routes events to the controllers.
pub struct SessionOrchestrator<H> {
    config: SessionConfig,
    placement: PlacementController,
    fade: ContentFadeController,
    playback: PlaybackControl,
    handles: TrackingHandles<H>,
    phase: SessionPhase,
    session_id: SessionId,
    video_size: Option<(u32, u32)>,
    point_cloud_ready: bool,
    // None until tracking produced a sample this session
    last_sample_valid: Option<bool>,
}

impl<H> Default for SessionOrchestrator<H> {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl<H> SessionOrchestrator<H> {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            placement: PlacementController::new(config.layout.clone()),
            fade: ContentFadeController::new(config.fade.clone()),
            playback: PlaybackControl::default(),
            handles: TrackingHandles::Unrequested,
            phase: SessionPhase::Idle,
            session_id: SessionId(0),
            video_size: None,
            point_cloud_ready: false,
            last_sample_valid: None,
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn placement(&self) -> &PlacementController {
        &self.placement
    }

    pub fn fade(&self) -> &ContentFadeController {
        &self.fade
    }

    pub fn playback(&self) -> &PlaybackControl {
        &self.playback
    }

    pub fn is_session_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    pub fn failure(&self) -> Option<&SessionError> {
        match &self.phase {
            SessionPhase::Failed(e) => Some(e),
            _ => None,
        }
    }

    // ---------------- session lifecycle ----------------

    /// An immersive session is now running. Tracking handles will be
    /// requested on the next [`take_handle_request`](Self::take_handle_request).
    pub fn start_session(&mut self) {
        log::info!("[session] started");
        self.phase = SessionPhase::Active;
        self.session_id = SessionId(self.session_id.0 + 1);
        self.handles = TrackingHandles::Unrequested;
        self.last_sample_valid = None;
    }

    /// The session could not be started. Reported once; not retried.
    pub fn session_failed(&mut self, error: SessionError) {
        log::error!("[session] {}", error);
        self.phase = SessionPhase::Failed(error);
        self.handles = TrackingHandles::Unrequested;
    }

    /// The session ended. Drops cached tracking handles so the next session
    /// re-acquires them, and clears the placement. Returns the media action
    /// needed to stop playback.
    pub fn end_session(&mut self) -> PlaybackRequest {
        log::info!("[session] ended");
        self.phase = SessionPhase::Idle;
        self.handles = TrackingHandles::Unrequested;
        self.last_sample_valid = None;
        self.placement.clear();
        self.fade.reset();
        self.playback.playing = false;
        PlaybackRequest::Pause
    }

    /// `Some` exactly once per session: the caller must now request the
    /// tracking handles and report back, tagged with the returned id, via
    /// [`install_handles`](Self::install_handles) or
    /// [`handles_failed`](Self::handles_failed).
    pub fn take_handle_request(&mut self) -> Option<SessionId> {
        if self.is_session_active() && matches!(self.handles, TrackingHandles::Unrequested) {
            self.handles = TrackingHandles::Requested;
            return Some(self.session_id);
        }
        None
    }

    /// Ignored unless a request from this same session is outstanding
    /// (the session may have ended while the request was in flight).
    pub fn install_handles(&mut self, session: SessionId, handles: H) -> bool {
        if session != self.session_id || !matches!(self.handles, TrackingHandles::Requested) {
            log::debug!("[session] dropping stale tracking handles");
            return false;
        }
        log::info!("[session] tracking handles ready");
        self.handles = TrackingHandles::Ready(handles);
        true
    }

    pub fn handles_failed(&mut self, session: SessionId, error: SessionError) {
        if session == self.session_id && matches!(self.handles, TrackingHandles::Requested) {
            log::error!("[session] {}", error);
            self.handles = TrackingHandles::Failed;
        }
    }

    pub fn handles(&self) -> Option<&H> {
        match &self.handles {
            TrackingHandles::Ready(h) => Some(h),
            _ => None,
        }
    }

    pub fn tracking(&self) -> &TrackingHandles<H> {
        &self.handles
    }

    // ---------------- media readiness ----------------

    pub fn set_video_size(&mut self, width: u32, height: u32) {
        self.video_size = (width > 0 && height > 0).then_some((width, height));
    }

    pub fn set_point_cloud_ready(&mut self, ready: bool) {
        self.point_cloud_ready = ready;
        if !ready {
            self.fade.reset();
        }
    }

    pub fn point_cloud_ready(&self) -> bool {
        self.point_cloud_ready
    }

    // ---------------- input events ----------------

    pub fn on_hit_sample(&mut self, sample: &HitSample) {
        self.last_sample_valid = Some(sample.valid);
        self.placement.on_hit_sample(sample);
    }

    /// User tap: place or move the content at the latest hit.
    pub fn confirm(&mut self) -> bool {
        if !self.is_session_active() {
            return false;
        }
        self.placement.confirm(self.video_size)
    }

    /// Unplace the content and stop playback.
    pub fn reset_placement(&mut self) -> PlaybackRequest {
        self.placement.reset();
        self.playback.playing = false;
        PlaybackRequest::Pause
    }

    pub fn apply_scale_gesture(&mut self, multiplier: f32) {
        self.placement.apply_scale_gesture(multiplier);
    }

    pub fn apply_rotation_gesture(&mut self, delta_radians: f32) {
        self.placement.apply_rotation_gesture(delta_radians);
    }

    /// Play/pause button. `None` while the control is disabled.
    pub fn toggle_play(&self) -> Option<PlaybackRequest> {
        if !self.placement.is_placed() {
            return None;
        }
        Some(if self.playback.playing {
            PlaybackRequest::Pause
        } else {
            PlaybackRequest::Play
        })
    }

    pub fn on_playback_started(&mut self) {
        self.playback.playing = true;
    }

    pub fn on_playback_paused(&mut self) {
        self.playback.playing = false;
    }

    /// Play was refused; the label keeps saying "Play".
    pub fn on_playback_rejected(&mut self, error: SessionError) {
        log::warn!("[media] {}", error);
    }

    /// Video clock update. Idle until the point cloud has loaded.
    pub fn on_playback_time(&mut self, t: f64, duration: f64) -> Option<FadePhase> {
        if !self.point_cloud_ready {
            return None;
        }
        self.fade.on_playback(t, duration)
    }

    // ---------------- per-frame ----------------

    /// One display refresh: record the hit sample (if tracking ran), advance
    /// the fade by `dt`, and draw. A render error is logged, never raised.
    pub fn tick<R: SceneRenderer>(
        &mut self,
        dt: Duration,
        sample: Option<HitSample>,
        renderer: &mut R,
    ) {
        if let Some(sample) = sample {
            self.on_hit_sample(&sample);
        }
        self.fade.advance(dt);
        let frame = self.scene_frame();
        if let Err(e) = renderer.draw(&frame) {
            log::error!("render error: {}", e);
        }
    }

    pub fn scene_frame(&self) -> SceneFrame<'_> {
        let content = self.placement.root_transform().and_then(|root| {
            let layout = self.placement.layout()?;
            let opacity = if self.point_cloud_ready {
                self.fade.opacity()
            } else {
                0.0
            };
            Some(PlacedContent {
                root,
                video_model: layout.video_model(root),
                shadow_model: layout.shadow_model(root),
                point_cloud_model: layout.point_cloud_model(root),
                point_cloud_opacity: opacity,
                point_cloud_phase: self.fade.phase(),
            })
        });
        SceneFrame {
            content,
            chroma: &self.config.chroma,
            shadow: &self.config.shadow,
        }
    }

    pub fn ui_state(&self) -> UiState {
        let active = self.is_session_active();
        let placed = self.placement.is_placed();
        let reticle_opacity = match self.last_sample_valid {
            Some(true) => RETICLE_OPACITY_HIT,
            _ => RETICLE_OPACITY_SEARCHING,
        };
        UiState {
            enter_visible: !active,
            enter_label: match self.phase {
                SessionPhase::Failed(_) => LABEL_AR_FAILED,
                _ => LABEL_ENTER_AR,
            },
            instructions_visible: !placed,
            place_hint_visible: active && !placed,
            play_visible: active,
            play_enabled: active && placed,
            play_label: self.playback.label(),
            reset_visible: active,
            reticle: ReticleState {
                visible: active,
                opacity: reticle_opacity,
            },
        }
    }
}
