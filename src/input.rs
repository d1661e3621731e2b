use glam::Vec2;
use smallvec::SmallVec;
use std::f32::consts::PI;

/// A recognised touch gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEvent {
    /// Finger distance relative to where the pinch began.
    Scale(f32),
    /// Yaw change in radians since the previous move, counter-clockwise
    /// seen from above.
    Rotate(f32),
    /// Short press without travel, at the release position.
    Tap(Vec2),
}

/// Which input confirms placement while a session runs.
///
/// With a DOM overlay every screen touch also reaches the page as pointer
/// events, where pinches and twists are told apart from taps. Without one
/// the page sees no pointer events and XR `select` is the only tap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TapSource {
    #[default]
    Pointer,
    XrSelect,
}

impl TapSource {
    pub fn for_session(has_dom_overlay: bool) -> Self {
        if has_dom_overlay {
            TapSource::Pointer
        } else {
            TapSource::XrSelect
        }
    }

    pub fn pointer_taps_confirm(self) -> bool {
        self == TapSource::Pointer
    }

    pub fn select_confirms(self) -> bool {
        self == TapSource::XrSelect
    }
}

pub type GestureEvents = SmallVec<[GestureEvent; 2]>;

#[derive(Clone, Copy, Debug)]
struct TrackedPointer {
    id: i32,
    start: Vec2,
    pos: Vec2,
}

#[derive(Clone, Copy, Debug)]
struct Pinch {
    start_distance: f32,
    last_angle: f32,
}

/// Turns raw pointer events into taps, pinches and twists.
///
/// Only the first two pointers count; a third finger cancels any pending tap
/// but does not disturb the pinch in progress.
#[derive(Debug)]
pub struct GestureTracker {
    pointers: SmallVec<[TrackedPointer; 2]>,
    pinch: Option<Pinch>,
    tap_cancelled: bool,
    tap_max_travel: f32,
    pinch_min_distance: f32,
}

impl GestureTracker {
    pub fn new(tap_max_travel: f32, pinch_min_distance: f32) -> Self {
        Self {
            pointers: SmallVec::new(),
            pinch: None,
            tap_cancelled: false,
            tap_max_travel,
            pinch_min_distance,
        }
    }

    pub fn active_pointers(&self) -> usize {
        self.pointers.len()
    }

    pub fn is_pinching(&self) -> bool {
        self.pinch.is_some()
    }

    pub fn pointer_down(&mut self, id: i32, pos: Vec2) {
        if self.pointers.iter().any(|p| p.id == id) {
            return;
        }
        if self.pointers.len() >= 2 {
            self.tap_cancelled = true;
            return;
        }
        if self.pointers.is_empty() {
            self.tap_cancelled = false;
        }
        self.pointers.push(TrackedPointer { id, start: pos, pos });
        if self.pointers.len() == 2 {
            self.tap_cancelled = true;
            self.begin_pinch();
        }
    }

    pub fn pointer_move(&mut self, id: i32, pos: Vec2) -> GestureEvents {
        let mut out = GestureEvents::new();
        let Some(p) = self.pointers.iter_mut().find(|p| p.id == id) else {
            return out;
        };
        p.pos = pos;
        if p.start.distance(pos) > self.tap_max_travel {
            self.tap_cancelled = true;
        }

        if self.pointers.len() == 2 {
            let (distance, angle) = self.span();
            match self.pinch.as_mut() {
                Some(pinch) => {
                    if pinch.start_distance >= self.pinch_min_distance {
                        out.push(GestureEvent::Scale(distance / pinch.start_distance));
                    }
                    let delta = wrap_angle(angle - pinch.last_angle);
                    pinch.last_angle = angle;
                    // screen y points down, so a clockwise twist has a positive screen delta
                    if delta != 0.0 {
                        out.push(GestureEvent::Rotate(-delta));
                    }
                }
                None => self.begin_pinch(),
            }
        }
        out
    }

    pub fn pointer_up(&mut self, id: i32, pos: Vec2) -> Option<GestureEvent> {
        let index = self.pointers.iter().position(|p| p.id == id)?;
        let released = self.pointers.remove(index);
        if self.pointers.len() < 2 {
            self.pinch = None;
        }
        let travelled = released.start.distance(pos) > self.tap_max_travel;
        if self.pointers.is_empty() && !self.tap_cancelled && !travelled {
            return Some(GestureEvent::Tap(pos));
        }
        None
    }

    pub fn pointer_cancel(&mut self, id: i32) {
        self.pointers.retain(|p| p.id != id);
        self.pinch = None;
        self.tap_cancelled = true;
    }

    fn begin_pinch(&mut self) {
        let (distance, angle) = self.span();
        self.pinch = Some(Pinch {
            start_distance: distance,
            last_angle: angle,
        });
    }

    fn span(&self) -> (f32, f32) {
        let d = self.pointers[1].pos - self.pointers[0].pos;
        (d.length(), d.y.atan2(d.x))
    }
}

/// Wrap an angle into (-π, π].
pub fn wrap_angle(a: f32) -> f32 {
    if !a.is_finite() {
        return 0.0;
    }
    let mut w = a.rem_euclid(2.0 * PI);
    if w > PI {
        w -= 2.0 * PI;
    }
    w
}
