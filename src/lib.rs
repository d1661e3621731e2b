#![cfg(target_arch = "wasm32")]
use ar_core::constants::VIDEO_SRC;
use ar_core::{SessionConfig, SessionOrchestrator};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod app;
mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod media;
mod render;
mod ui;
mod xr;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("ar-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(constants::CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", constants::CANVAS_ID))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    let gl = render::create_xr_context(&canvas)?;
    let renderer = render::GlRenderer::new(gl.clone())?;
    let video = media::create_video(&document, VIDEO_SRC)?;
    let orchestrator = SessionOrchestrator::new(SessionConfig::default());

    let app = app::App::new(orchestrator, renderer, gl, video, document);
    app.refresh_ui();

    app::wire_controls(&app);
    media::wire_video_events(&app);
    events::wire_input_handlers(&app);
    app::load_point_cloud(&app);
    Ok(())
}
