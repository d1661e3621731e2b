//! WebXR bindings and session plumbing.
//!
//! web-sys only exposes WebXR behind `web_sys_unstable_apis`, and the hit-test
//! module not at all, so the handful of interfaces we touch are declared here.

use crate::constants::*;
use anyhow::anyhow;
use ar_core::{HitSample, RigidTransform};
use glam::Mat4;
use js_sys::{Array, Float32Array, Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(extends = web::EventTarget, js_name = XRSystem)]
    #[derive(Debug, Clone)]
    pub type XrSystem;
    #[wasm_bindgen(method, js_class = "XRSystem", js_name = isSessionSupported)]
    fn is_session_supported(this: &XrSystem, mode: &str) -> Promise;
    #[wasm_bindgen(method, js_class = "XRSystem", js_name = requestSession)]
    fn request_session(this: &XrSystem, mode: &str, init: &Object) -> Promise;

    #[wasm_bindgen(extends = web::EventTarget, js_name = XRSession)]
    #[derive(Debug, Clone)]
    pub type XrSession;
    #[wasm_bindgen(method, js_class = "XRSession", js_name = requestReferenceSpace)]
    fn request_reference_space(this: &XrSession, kind: &str) -> Promise;
    #[wasm_bindgen(method, js_class = "XRSession", js_name = requestHitTestSource)]
    fn request_hit_test_source(this: &XrSession, options: &Object) -> Promise;
    #[wasm_bindgen(method, js_class = "XRSession", js_name = requestAnimationFrame)]
    pub fn request_animation_frame(this: &XrSession, callback: &js_sys::Function) -> u32;
    #[wasm_bindgen(method, js_class = "XRSession", js_name = updateRenderState)]
    fn update_render_state(this: &XrSession, state: &Object);
    #[wasm_bindgen(method, js_class = "XRSession")]
    pub fn end(this: &XrSession) -> Promise;
    #[wasm_bindgen(method, getter, js_class = "XRSession", js_name = domOverlayState)]
    fn dom_overlay_state(this: &XrSession) -> JsValue;

    #[wasm_bindgen(extends = web::EventTarget, js_name = XRSpace)]
    #[derive(Debug, Clone)]
    pub type XrSpace;

    #[wasm_bindgen(extends = XrSpace, extends = web::EventTarget, js_name = XRReferenceSpace)]
    #[derive(Debug, Clone)]
    pub type XrReferenceSpace;

    #[wasm_bindgen(js_name = XRHitTestSource)]
    #[derive(Debug, Clone)]
    pub type XrHitTestSource;
    #[wasm_bindgen(method, catch, js_class = "XRHitTestSource")]
    fn cancel(this: &XrHitTestSource) -> Result<(), JsValue>;

    #[wasm_bindgen(js_name = XRFrame)]
    #[derive(Debug, Clone)]
    pub type XrFrame;
    #[wasm_bindgen(method, js_class = "XRFrame", js_name = getViewerPose)]
    pub fn get_viewer_pose(this: &XrFrame, space: &XrReferenceSpace) -> Option<XrViewerPose>;
    #[wasm_bindgen(method, js_class = "XRFrame", js_name = getHitTestResults)]
    fn get_hit_test_results(this: &XrFrame, source: &XrHitTestSource) -> Array;

    #[wasm_bindgen(js_name = XRHitTestResult)]
    pub type XrHitTestResult;
    #[wasm_bindgen(method, js_class = "XRHitTestResult", js_name = getPose)]
    fn get_pose(this: &XrHitTestResult, base: &XrSpace) -> Option<XrPose>;

    #[wasm_bindgen(js_name = XRPose)]
    pub type XrPose;
    #[wasm_bindgen(method, getter, js_class = "XRPose")]
    fn transform(this: &XrPose) -> XrRigidTransform;

    #[wasm_bindgen(extends = XrPose, js_name = XRViewerPose)]
    pub type XrViewerPose;
    #[wasm_bindgen(method, getter, js_class = "XRViewerPose")]
    pub fn views(this: &XrViewerPose) -> Array;

    #[wasm_bindgen(js_name = XRView)]
    pub type XrView;
    #[wasm_bindgen(method, getter, js_class = "XRView", js_name = projectionMatrix)]
    fn projection_matrix(this: &XrView) -> Float32Array;
    #[wasm_bindgen(method, getter, js_class = "XRView", js_name = transform)]
    fn view_transform(this: &XrView) -> XrRigidTransform;

    #[wasm_bindgen(js_name = XRRigidTransform)]
    pub type XrRigidTransform;
    #[wasm_bindgen(method, getter, js_class = "XRRigidTransform")]
    fn matrix(this: &XrRigidTransform) -> Float32Array;
    #[wasm_bindgen(method, getter, js_class = "XRRigidTransform")]
    fn inverse(this: &XrRigidTransform) -> XrRigidTransform;

    #[wasm_bindgen(js_name = XRWebGLLayer)]
    #[derive(Debug, Clone)]
    pub type XrWebGlLayer;
    #[wasm_bindgen(constructor, js_class = "XRWebGLLayer", catch)]
    fn new(session: &XrSession, gl: &web::WebGl2RenderingContext) -> Result<XrWebGlLayer, JsValue>;
    #[wasm_bindgen(method, getter, js_class = "XRWebGLLayer")]
    pub fn framebuffer(this: &XrWebGlLayer) -> Option<web::WebGlFramebuffer>;
    #[wasm_bindgen(method, js_class = "XRWebGLLayer", js_name = getViewport)]
    fn get_viewport(this: &XrWebGlLayer, view: &XrView) -> Option<XrViewport>;

    #[wasm_bindgen(js_name = XRViewport)]
    pub type XrViewport;
    #[wasm_bindgen(method, getter, js_class = "XRViewport")]
    fn x(this: &XrViewport) -> i32;
    #[wasm_bindgen(method, getter, js_class = "XRViewport")]
    fn y(this: &XrViewport) -> i32;
    #[wasm_bindgen(method, getter, js_class = "XRViewport")]
    fn width(this: &XrViewport) -> i32;
    #[wasm_bindgen(method, getter, js_class = "XRViewport")]
    fn height(this: &XrViewport) -> i32;
}

fn js_err(e: JsValue) -> anyhow::Error {
    anyhow!("{:?}", e)
}

/// A running immersive session with its render layer and floor space.
#[derive(Clone)]
pub struct XrContext {
    pub session: XrSession,
    pub layer: XrWebGlLayer,
    pub space: XrReferenceSpace,
}

impl XrContext {
    /// Whether the browser granted the `dom-overlay` feature.
    pub fn has_dom_overlay(&self) -> bool {
        let state = self.session.dom_overlay_state();
        !state.is_undefined() && !state.is_null()
    }
}

/// Handles needed to sample surface hits; requested once per session.
pub struct XrTrackingHandles {
    pub hit_source: XrHitTestSource,
    pub space: XrReferenceSpace,
}

impl Drop for XrTrackingHandles {
    fn drop(&mut self) {
        // already gone if the session ended first
        _ = self.hit_source.cancel();
    }
}

/// Pixel rectangle of one eye (or the single handheld view).
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// One view's camera for this frame.
pub struct ViewCamera {
    pub viewport: Viewport,
    pub view_proj: Mat4,
}

fn xr_system(window: &web::Window) -> Option<XrSystem> {
    let xr = Reflect::get(&window.navigator(), &JsValue::from_str("xr")).ok()?;
    if xr.is_undefined() || xr.is_null() {
        return None;
    }
    Some(xr.unchecked_into())
}

fn session_init(overlay_root: Option<&web::Element>) -> Result<Object, JsValue> {
    let init = Object::new();
    let required: Array = XR_REQUIRED_FEATURES.iter().map(|f| JsValue::from_str(f)).collect();
    Reflect::set(&init, &"requiredFeatures".into(), &required)?;
    let optional: Array = XR_OPTIONAL_FEATURES.iter().map(|f| JsValue::from_str(f)).collect();
    Reflect::set(&init, &"optionalFeatures".into(), &optional)?;
    if let Some(root) = overlay_root {
        let dom_overlay = Object::new();
        Reflect::set(&dom_overlay, &"root".into(), root)?;
        Reflect::set(&init, &"domOverlay".into(), &dom_overlay)?;
    }
    Ok(init)
}

/// Start an `immersive-ar` session rendering into `gl`.
///
/// `gl` must have been created with `xrCompatible: true`.
pub async fn request_immersive_session(
    gl: &web::WebGl2RenderingContext,
    overlay_root: Option<&web::Element>,
) -> anyhow::Result<XrContext> {
    let window = web::window().ok_or_else(|| anyhow!("no window"))?;
    let xr = xr_system(&window).ok_or_else(|| anyhow!("WebXR is not available"))?;

    let supported = JsFuture::from(xr.is_session_supported(XR_SESSION_MODE))
        .await
        .map_err(js_err)?;
    if !supported.as_bool().unwrap_or(false) {
        anyhow::bail!("{} sessions are not supported", XR_SESSION_MODE);
    }

    let init = session_init(overlay_root).map_err(js_err)?;
    let session: XrSession = JsFuture::from(xr.request_session(XR_SESSION_MODE, &init))
        .await
        .map_err(js_err)?
        .unchecked_into();

    match attach_layer(&session, gl).await {
        Ok(ctx) => Ok(ctx),
        Err(e) => {
            _ = session.end();
            Err(e)
        }
    }
}

async fn attach_layer(
    session: &XrSession,
    gl: &web::WebGl2RenderingContext,
) -> anyhow::Result<XrContext> {
    let layer = XrWebGlLayer::new(session, gl).map_err(js_err)?;
    let state = Object::new();
    Reflect::set(&state, &"baseLayer".into(), &layer).map_err(js_err)?;
    session.update_render_state(&state);

    let space: XrReferenceSpace = JsFuture::from(session.request_reference_space(XR_REFERENCE_SPACE))
        .await
        .map_err(js_err)?
        .unchecked_into();
    log::info!("[xr] session running with {} space", XR_REFERENCE_SPACE);
    Ok(XrContext {
        session: session.clone(),
        layer,
        space,
    })
}

/// Ask for a viewer-space hit-test source.
pub async fn request_tracking_handles(ctx: &XrContext) -> anyhow::Result<XrTrackingHandles> {
    let viewer: XrSpace = JsFuture::from(ctx.session.request_reference_space(XR_VIEWER_SPACE))
        .await
        .map_err(js_err)?
        .unchecked_into();
    let options = Object::new();
    Reflect::set(&options, &"space".into(), &viewer).map_err(js_err)?;
    let hit_source: XrHitTestSource = JsFuture::from(ctx.session.request_hit_test_source(&options))
        .await
        .map_err(js_err)?
        .unchecked_into();
    Ok(XrTrackingHandles {
        hit_source,
        space: ctx.space.clone(),
    })
}

fn to_array16(values: &Float32Array) -> Option<[f32; 16]> {
    if values.length() != 16 {
        return None;
    }
    let mut out = [0.0; 16];
    values.copy_to(&mut out);
    Some(out)
}

fn to_mat4(values: &Float32Array) -> Option<Mat4> {
    let cols = to_array16(values)?;
    let m = Mat4::from_cols_array(&cols);
    m.is_finite().then_some(m)
}

/// First hit of this frame, or a miss.
pub fn sample_hit(frame: &XrFrame, handles: &XrTrackingHandles) -> HitSample {
    let results = frame.get_hit_test_results(&handles.hit_source);
    if results.length() == 0 {
        return HitSample::miss();
    }
    let first: XrHitTestResult = results.get(0).unchecked_into();
    first
        .get_pose(&handles.space)
        .and_then(|pose| to_array16(&pose.transform().matrix()))
        .and_then(|cols| RigidTransform::from_cols_array(&cols))
        .map(HitSample::hit)
        .unwrap_or_else(HitSample::miss)
}

/// Cameras for every view of the viewer pose. Empty while tracking is lost.
pub fn view_cameras(frame: &XrFrame, ctx: &XrContext) -> Vec<ViewCamera> {
    let Some(pose) = frame.get_viewer_pose(&ctx.space) else {
        return Vec::new();
    };
    pose.views()
        .iter()
        .filter_map(|v| {
            let view: XrView = v.unchecked_into();
            let vp = ctx.layer.get_viewport(&view)?;
            let proj = to_mat4(&view.projection_matrix())?;
            let view_matrix = to_mat4(&view.view_transform().inverse().matrix())?;
            Some(ViewCamera {
                viewport: Viewport {
                    x: vp.x(),
                    y: vp.y(),
                    width: vp.width(),
                    height: vp.height(),
                },
                view_proj: proj * view_matrix,
            })
        })
        .collect()
}
