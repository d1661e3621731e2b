use crate::constants::*;
use crate::dom;
use ar_core::UiState;
use web_sys as web;

/// Writes [`UiState`] into the DOM controls, touching the page only when
/// something changed since the last write.
pub struct UiMirror {
    document: web::Document,
    last: Option<UiState>,
}

impl UiMirror {
    pub fn new(document: web::Document) -> Self {
        Self {
            document,
            last: None,
        }
    }

    pub fn apply(&mut self, state: &UiState) {
        if self.last.as_ref() == Some(state) {
            return;
        }
        let d = &self.document;
        dom::set_hidden(d, ENTER_AR_ID, !state.enter_visible);
        dom::set_text(d, ENTER_AR_ID, state.enter_label);
        dom::set_hidden(d, INSTRUCTIONS_ID, !state.instructions_visible);
        dom::set_hidden(d, PLACE_HINT_ID, !state.place_hint_visible);
        dom::set_hidden(d, PLAY_BUTTON_ID, !state.play_visible);
        dom::set_disabled(d, PLAY_BUTTON_ID, !state.play_enabled);
        dom::set_text(d, PLAY_BUTTON_ID, state.play_label);
        dom::set_hidden(d, RESET_BUTTON_ID, !state.reset_visible);
        dom::set_hidden(d, RETICLE_ID, !state.reticle.visible);
        dom::set_opacity(d, RETICLE_ID, state.reticle.opacity);
        self.last = Some(state.clone());
    }
}
