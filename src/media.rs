use crate::app::App;
use crate::dom;
use anyhow::anyhow;
use ar_core::SessionError;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// Hidden looping `<video>` used as the chroma-key texture source.
pub fn create_video(document: &web::Document, src: &str) -> anyhow::Result<web::HtmlVideoElement> {
    let video: web::HtmlVideoElement = document
        .create_element("video")
        .map_err(|e| anyhow!("{:?}", e))?
        .dyn_into()
        .map_err(|_| anyhow!("not a video element"))?;
    video.set_cross_origin(Some("anonymous"));
    video.set_loop(true);
    video.set_preload("auto");
    // inline playback on iOS; without it play() goes fullscreen
    _ = video.set_attribute("playsinline", "");
    _ = video.set_attribute("webkit-playsinline", "");
    video.set_src(src);
    Ok(video)
}

/// Start playback. Autoplay policies may refuse; the error says why.
pub async fn play(video: &web::HtmlVideoElement) -> Result<(), SessionError> {
    let rejected = |e: wasm_bindgen::JsValue| SessionError::PlaybackRejected(format!("{:?}", e));
    let promise = video.play().map_err(rejected)?;
    JsFuture::from(promise).await.map(|_| ()).map_err(rejected)
}

pub fn pause(video: &web::HtmlVideoElement) {
    if let Err(e) = video.pause() {
        log::warn!("[media] pause failed: {:?}", e);
    }
}

/// Feed the orchestrator from the video element's own events.
pub fn wire_video_events(app: &App) {
    let target: &web::EventTarget = app.video.as_ref();

    let a = app.clone();
    dom::add_event_listener(target, "loadedmetadata", move |_: web::Event| {
        let (w, h) = (a.video.video_width(), a.video.video_height());
        log::info!("[media] video {}x{}", w, h);
        a.orchestrator.borrow_mut().set_video_size(w, h);
    });

    let a = app.clone();
    dom::add_event_listener(target, "timeupdate", move |_: web::Event| {
        let (t, d) = (a.video.current_time(), a.video.duration());
        let changed = a.orchestrator.borrow_mut().on_playback_time(t, d);
        if let Some(phase) = changed {
            log::info!("[fade] {} at {:.2}s of {:.2}s", phase, t, d);
        }
    });

    // covers pauses we did not ask for (e.g. the page being hidden)
    let a = app.clone();
    dom::add_event_listener(target, "pause", move |_: web::Event| {
        a.orchestrator.borrow_mut().on_playback_paused();
        a.refresh_ui();
    });

    dom::add_event_listener(target, "error", move |_: web::Event| {
        log::error!("[media] video failed to load");
    });
}

/// GET `url` and return the body.
pub async fn fetch_bytes(url: &str) -> anyhow::Result<Vec<u8>> {
    let window = web::window().ok_or_else(|| anyhow!("no window"))?;
    let response: web::Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| anyhow!("fetch {}: {:?}", url, e))?
        .dyn_into()
        .map_err(|_| anyhow!("fetch {}: not a Response", url))?;
    if !response.ok() {
        anyhow::bail!("fetch {}: HTTP {}", url, response.status());
    }
    let body = JsFuture::from(response.array_buffer().map_err(|e| anyhow!("{:?}", e))?)
        .await
        .map_err(|e| anyhow!("read {}: {:?}", url, e))?;
    Ok(js_sys::Uint8Array::new(&body).to_vec())
}
