use crate::app::App;
use crate::dom;
use crate::xr::XrSession;
use web_sys as web;

/// `end` tears the session state down. `select` confirms placement only when
/// there is no DOM overlay; otherwise taps come through the pointer path.
pub fn wire_session_events(app: &App, session: &XrSession) {
    let target: &web::EventTarget = session.as_ref();

    let a = app.clone();
    dom::add_event_listener(target, "end", move |_: web::Event| {
        a.on_session_end();
    });

    let a = app.clone();
    dom::add_event_listener(target, "select", move |_: web::Event| {
        if a.tap_source.get().select_confirms() {
            a.confirm();
        }
    });
}
