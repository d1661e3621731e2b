use crate::app::App;
use crate::constants::{OVERLAY_ROOT_ID, PINCH_MIN_DISTANCE_PX, TAP_MAX_TRAVEL_PX};
use crate::dom;
use crate::input::{GestureEvent, GestureTracker};
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

#[derive(Clone)]
pub struct InputWiring {
    pub app: App,
    pub tracker: Rc<RefCell<GestureTracker>>,
}

pub fn wire_input_handlers(app: &App) {
    let Some(window) = web::window() else {
        return;
    };
    let w = InputWiring {
        app: app.clone(),
        tracker: Rc::new(RefCell::new(GestureTracker::new(
            TAP_MAX_TRAVEL_PX,
            PINCH_MIN_DISTANCE_PX,
        ))),
    };
    let target: &web::EventTarget = window.as_ref();
    wire_pointerdown(&w, target);
    wire_pointermove(&w, target);
    wire_pointerup(&w, target);
    wire_pointercancel(&w, target);
    suppress_select_on_buttons(&app.document);
}

fn pointer_pos(ev: &web::PointerEvent) -> Vec2 {
    Vec2::new(ev.client_x() as f32, ev.client_y() as f32)
}

fn dispatch(app: &App, event: GestureEvent) {
    match event {
        GestureEvent::Scale(multiplier) => {
            app.orchestrator.borrow_mut().apply_scale_gesture(multiplier)
        }
        GestureEvent::Rotate(delta) => app.orchestrator.borrow_mut().apply_rotation_gesture(delta),
        GestureEvent::Tap(_) => {
            if app.tap_source.get().pointer_taps_confirm() {
                app.confirm();
            }
        }
    }
}

fn wire_pointerdown(w: &InputWiring, target: &web::EventTarget) {
    let w = w.clone();
    dom::add_event_listener(target, "pointerdown", move |ev: web::PointerEvent| {
        // buttons handle their own clicks
        if dom::event_targets_button(&ev) {
            return;
        }
        let mut tracker = w.tracker.borrow_mut();
        let was_pinching = tracker.is_pinching();
        tracker.pointer_down(ev.pointer_id(), pointer_pos(&ev));
        if !was_pinching && tracker.is_pinching() {
            log::debug!("[input] pinch started ({} pointers)", tracker.active_pointers());
        }
    });
}

fn wire_pointermove(w: &InputWiring, target: &web::EventTarget) {
    let w = w.clone();
    dom::add_event_listener(target, "pointermove", move |ev: web::PointerEvent| {
        let events = w
            .tracker
            .borrow_mut()
            .pointer_move(ev.pointer_id(), pointer_pos(&ev));
        for event in events {
            dispatch(&w.app, event);
        }
    });
}

fn wire_pointerup(w: &InputWiring, target: &web::EventTarget) {
    let w = w.clone();
    dom::add_event_listener(target, "pointerup", move |ev: web::PointerEvent| {
        let event = w
            .tracker
            .borrow_mut()
            .pointer_up(ev.pointer_id(), pointer_pos(&ev));
        if let Some(event) = event {
            dispatch(&w.app, event);
        }
    });
}

fn wire_pointercancel(w: &InputWiring, target: &web::EventTarget) {
    let w = w.clone();
    dom::add_event_listener(target, "pointercancel", move |ev: web::PointerEvent| {
        w.tracker.borrow_mut().pointer_cancel(ev.pointer_id());
    });
}

// With a DOM overlay, touching a button would also raise an XR `select`.
fn suppress_select_on_buttons(document: &web::Document) {
    let Some(root) = document.get_element_by_id(OVERLAY_ROOT_ID) else {
        return;
    };
    let target: &web::EventTarget = root.as_ref();
    dom::add_event_listener(target, "beforexrselect", move |ev: web::Event| {
        if dom::event_targets_button(&ev) {
            ev.prevent_default();
        }
    });
}
