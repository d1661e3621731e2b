use crate::constants::*;
use crate::frame::{self, ActiveSession};
use crate::input::TapSource;
use crate::media;
use crate::render::GlRenderer;
use crate::ui::UiMirror;
use crate::xr::{self, XrTrackingHandles};
use crate::{dom, events};
use ar_core::constants::PLY_SRC;
use ar_core::{PlaybackRequest, SessionError, SessionOrchestrator};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

pub type Orchestrator = SessionOrchestrator<XrTrackingHandles>;

/// Page-lifetime handles shared by every event closure.
#[derive(Clone)]
pub struct App {
    pub orchestrator: Rc<RefCell<Orchestrator>>,
    pub renderer: Rc<RefCell<GlRenderer>>,
    pub gl: web::WebGl2RenderingContext,
    pub video: web::HtmlVideoElement,
    pub document: web::Document,
    pub ui: Rc<RefCell<UiMirror>>,
    pub session: Rc<RefCell<Option<ActiveSession>>>,
    pub tap_source: Rc<Cell<TapSource>>,
    starting: Rc<Cell<bool>>,
}

impl App {
    pub fn new(
        orchestrator: Orchestrator,
        renderer: GlRenderer,
        gl: web::WebGl2RenderingContext,
        video: web::HtmlVideoElement,
        document: web::Document,
    ) -> Self {
        Self {
            orchestrator: Rc::new(RefCell::new(orchestrator)),
            renderer: Rc::new(RefCell::new(renderer)),
            gl,
            video,
            ui: Rc::new(RefCell::new(UiMirror::new(document.clone()))),
            document,
            session: Rc::new(RefCell::new(None)),
            tap_source: Rc::new(Cell::new(TapSource::default())),
            starting: Rc::new(Cell::new(false)),
        }
    }

    pub fn refresh_ui(&self) {
        let state = self.orchestrator.borrow().ui_state();
        self.ui.borrow_mut().apply(&state);
    }

    /// Carry out a media action; the label flips only once playback is confirmed.
    pub fn run_playback(&self, request: PlaybackRequest) {
        match request {
            PlaybackRequest::Pause => {
                media::pause(&self.video);
                self.orchestrator.borrow_mut().on_playback_paused();
            }
            PlaybackRequest::Play => {
                let app = self.clone();
                spawn_local(async move {
                    match media::play(&app.video).await {
                        Ok(()) => app.orchestrator.borrow_mut().on_playback_started(),
                        Err(e) => app.orchestrator.borrow_mut().on_playback_rejected(e),
                    }
                    app.refresh_ui();
                });
            }
        }
    }

    pub fn enter_ar(&self) {
        if self.starting.get() || self.orchestrator.borrow().is_session_active() {
            return;
        }
        self.starting.set(true);
        let app = self.clone();
        spawn_local(async move {
            let overlay_root = app.document.get_element_by_id(OVERLAY_ROOT_ID);
            match xr::request_immersive_session(&app.gl, overlay_root.as_ref()).await {
                Ok(ctx) => {
                    let source = TapSource::for_session(ctx.has_dom_overlay());
                    log::info!("[xr] session started, placing on {:?}", source);
                    app.tap_source.set(source);
                    app.orchestrator.borrow_mut().start_session();
                    events::wire_session_events(&app, &ctx.session);
                    let active = frame::start_xr_loop(&app, ctx);
                    *app.session.borrow_mut() = Some(active);
                }
                Err(e) => {
                    let err = SessionError::CapabilityUnavailable(format!("{:#}", e));
                    app.orchestrator.borrow_mut().session_failed(err);
                }
            }
            app.starting.set(false);
            app.refresh_ui();
        });
    }

    /// The platform ended the session (user exit or system).
    pub fn on_session_end(&self) {
        let request = self.orchestrator.borrow_mut().end_session();
        self.run_playback(request);
        if let Some(active) = self.session.borrow_mut().take() {
            active.stop();
        }
        self.tap_source.set(TapSource::default());
        self.refresh_ui();
    }

    pub fn confirm(&self) {
        let placed = self.orchestrator.borrow_mut().confirm();
        if placed {
            log::info!("[placement] content placed");
        }
        self.refresh_ui();
    }

    pub fn reset(&self) {
        let request = self.orchestrator.borrow_mut().reset_placement();
        self.run_playback(request);
        self.refresh_ui();
    }

    pub fn toggle_play(&self) {
        let request = self.orchestrator.borrow().toggle_play();
        if let Some(request) = request {
            self.run_playback(request);
        }
        self.refresh_ui();
    }
}

pub fn wire_controls(app: &App) {
    let a = app.clone();
    dom::add_click_listener(&app.document, ENTER_AR_ID, move || a.enter_ar());
    let a = app.clone();
    dom::add_click_listener(&app.document, PLAY_BUTTON_ID, move || a.toggle_play());
    let a = app.clone();
    dom::add_click_listener(&app.document, RESET_BUTTON_ID, move || a.reset());
}

/// Fetch and decode the point cloud in the background. Until it arrives the
/// fade stays idle and nothing is drawn for it.
pub fn load_point_cloud(app: &App) {
    let app = app.clone();
    spawn_local(async move {
        let loaded = media::fetch_bytes(PLY_SRC)
            .await
            .and_then(|bytes| Ok(ar_core::ply::parse(&bytes)?))
            .and_then(|cloud| {
                app.renderer.borrow_mut().set_point_cloud(&cloud)?;
                Ok(cloud.len())
            });
        match loaded {
            Ok(n) => {
                log::info!("[ply] {} points from {}", n, PLY_SRC);
                let ready = app.renderer.borrow().has_point_cloud();
                app.orchestrator.borrow_mut().set_point_cloud_ready(ready);
            }
            Err(e) => log::warn!("[ply] point cloud unavailable: {:#}", e),
        }
    });
}
