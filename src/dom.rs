use crate::constants::HIDDEN_CLASS;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    } else {
        log::warn!("[dom] #{} not found, click ignored", element_id);
    }
}

/// Attach a listener for the page lifetime.
pub fn add_event_listener<E>(
    target: &web::EventTarget,
    event: &str,
    handler: impl FnMut(E) + 'static,
) where
    E: FromWasmAbi + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    if let Err(e) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
    {
        log::warn!("[dom] could not listen for {}: {:?}", event, e);
    }
    closure.forget();
}

pub fn set_hidden(document: &web::Document, id: &str, hidden: bool) {
    if let Some(el) = document.get_element_by_id(id) {
        let cl = el.class_list();
        if hidden {
            _ = cl.add_1(HIDDEN_CLASS);
        } else {
            _ = cl.remove_1(HIDDEN_CLASS);
        }
        // fallback for pages without the CSS class
        if let Some(html) = el.dyn_ref::<web::HtmlElement>() {
            _ = html
                .style()
                .set_property("display", if hidden { "none" } else { "" });
        }
    }
}

pub fn set_text(document: &web::Document, id: &str, text: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        el.set_text_content(Some(text));
    }
}

pub fn set_disabled(document: &web::Document, id: &str, disabled: bool) {
    if let Some(button) = document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<web::HtmlButtonElement>().ok())
    {
        button.set_disabled(disabled);
    }
}

pub fn set_opacity(document: &web::Document, id: &str, opacity: f32) {
    if let Some(html) = document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<web::HtmlElement>().ok())
    {
        _ = html.style().set_property("opacity", &format!("{:.2}", opacity));
    }
}

/// True when the event started on (or inside) a button.
pub fn event_targets_button(ev: &web::Event) -> bool {
    ev.target()
        .and_then(|t| t.dyn_into::<web::Element>().ok())
        .and_then(|el| el.closest("button").ok().flatten())
        .is_some()
}
