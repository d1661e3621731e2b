use crate::app::App;
use crate::render::GlRenderer;
use crate::xr::{self, XrContext, XrFrame};
use ar_core::{SceneFrame, SceneRenderer, SessionError};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

type TickClosure = Closure<dyn FnMut(f64, XrFrame)>;

pub struct FrameContext {
    pub app: App,
    pub xr: XrContext,
    pub last_instant: Instant,
}

/// Renders a [`SceneFrame`] into every view of one XR frame.
struct XrViewTarget<'a> {
    renderer: &'a mut GlRenderer,
    frame: &'a XrFrame,
    xr: &'a XrContext,
}

impl SceneRenderer for XrViewTarget<'_> {
    type Error = anyhow::Error;

    fn draw(&mut self, scene: &SceneFrame<'_>) -> anyhow::Result<()> {
        let cameras = xr::view_cameras(self.frame, self.xr);
        if cameras.is_empty() {
            // tracking lost this frame
            return Ok(());
        }
        let framebuffer = self.xr.layer.framebuffer();
        self.renderer.render(framebuffer.as_ref(), &cameras, scene);
        Ok(())
    }
}

impl FrameContext {
    pub fn frame(&mut self, xr_frame: &XrFrame) {
        let now = Instant::now();
        let dt = now - self.last_instant;
        self.last_instant = now;

        let request = self.app.orchestrator.borrow_mut().take_handle_request();
        if let Some(session_id) = request {
            let orchestrator = self.app.orchestrator.clone();
            let ctx = self.xr.clone();
            spawn_local(async move {
                match xr::request_tracking_handles(&ctx).await {
                    Ok(handles) => {
                        orchestrator.borrow_mut().install_handles(session_id, handles);
                    }
                    Err(e) => {
                        let err = SessionError::TrackingUnavailable(format!("{:#}", e));
                        orchestrator.borrow_mut().handles_failed(session_id, err);
                    }
                }
            });
        }

        let sample = self
            .app
            .orchestrator
            .borrow()
            .handles()
            .map(|handles| xr::sample_hit(xr_frame, handles));

        {
            let mut renderer = self.app.renderer.borrow_mut();
            if self.app.orchestrator.borrow().placement().is_placed() {
                renderer.upload_video_frame(&self.app.video);
            }
            let mut target = XrViewTarget {
                renderer: &mut renderer,
                frame: xr_frame,
                xr: &self.xr,
            };
            self.app.orchestrator.borrow_mut().tick(dt, sample, &mut target);
        }

        self.app.refresh_ui();
    }
}

/// A running session's frame loop. Dropping the closure stops it.
pub struct ActiveSession {
    tick: Rc<RefCell<Option<TickClosure>>>,
}

impl ActiveSession {
    pub fn stop(self) {
        self.tick.borrow_mut().take();
    }
}

pub fn start_xr_loop(app: &App, xr: XrContext) -> ActiveSession {
    let session = xr.session.clone();
    let frame_ctx = Rc::new(RefCell::new(FrameContext {
        app: app.clone(),
        xr,
        last_instant: Instant::now(),
    }));

    let tick: Rc<RefCell<Option<TickClosure>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let session_tick = session.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move |_time: f64, xr_frame: XrFrame| {
        frame_ctx.borrow_mut().frame(&xr_frame);
        if let Some(cb) = tick_clone.borrow().as_ref() {
            session_tick.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64, XrFrame)>));

    if let Some(cb) = tick.borrow().as_ref() {
        session.request_animation_frame(cb.as_ref().unchecked_ref());
    }
    ActiveSession { tick }
}
