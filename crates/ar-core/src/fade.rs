//! Playback-driven fade of the secondary (point-cloud) content.
//!
//! Two inputs drive the controller and they own different things:
//! [`ContentFadeController::on_playback`] decides *when* a fade starts from
//! the video clock, while [`ContentFadeController::advance`] is the only
//! writer of opacity during a fade and runs on real elapsed time. The one
//! exception is the rewind guard, which snaps straight to hidden.

use crate::constants::*;
use crate::reveal::Tween;
use std::fmt;
use std::time::Duration;

/// Observable phase of a fade cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FadePhase {
    Hidden,
    FadingIn,
    Visible,
    FadingOut,
}

impl FadePhase {
    /// Opacity this phase is heading toward.
    pub fn target_opacity(self) -> f32 {
        match self {
            FadePhase::FadingIn | FadePhase::Visible => 1.0,
            FadePhase::Hidden | FadePhase::FadingOut => 0.0,
        }
    }
}

impl fmt::Display for FadePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FadePhase::Hidden => "hidden",
            FadePhase::FadingIn => "fading-in",
            FadePhase::Visible => "visible",
            FadePhase::FadingOut => "fading-out",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq)]
enum FadeState {
    Hidden,
    FadingIn(Tween),
    Visible,
    FadingOut(Tween),
}

/// Trigger points and fade length, relative to the clip duration.
#[derive(Clone, Debug, PartialEq)]
pub struct FadeTiming {
    pub reveal_fraction: f64,
    pub conceal_fraction: f64,
    pub conceal_lead_sec: f64,
    pub rewind_threshold_sec: f64,
    pub min_reveal_sec: f64,
    pub fade_duration: Duration,
}

impl Default for FadeTiming {
    fn default() -> Self {
        Self {
            reveal_fraction: REVEAL_FRACTION,
            conceal_fraction: CONCEAL_FRACTION,
            conceal_lead_sec: CONCEAL_LEAD_SEC,
            rewind_threshold_sec: REWIND_THRESHOLD_SEC,
            min_reveal_sec: MIN_REVEAL_SEC,
            fade_duration: Duration::from_secs_f64(FADE_DURATION_SEC),
        }
    }
}

impl FadeTiming {
    /// Playback time at which the content starts fading in.
    ///
    /// Never earlier than `min_reveal_sec`, so a very short clip cannot
    /// reveal inside the rewind window.
    pub fn reveal_at(&self, duration_sec: f64) -> f64 {
        (duration_sec * self.reveal_fraction).max(self.min_reveal_sec)
    }

    /// Playback time at which the content starts fading out.
    pub fn conceal_at(&self, duration_sec: f64) -> f64 {
        (duration_sec - self.conceal_lead_sec).max(duration_sec * self.conceal_fraction)
    }
}

/// Fade state machine for one visual: `Hidden -> FadingIn -> Visible -> FadingOut -> Hidden`.
#[derive(Clone, Debug)]
pub struct ContentFadeController {
    state: FadeState,
    opacity: f32,
    timing: FadeTiming,
    // set once the reveal fired in the current playback loop
    revealed_this_loop: bool,
}

impl Default for ContentFadeController {
    fn default() -> Self {
        Self::new(FadeTiming::default())
    }
}

impl ContentFadeController {
    pub fn new(timing: FadeTiming) -> Self {
        Self {
            state: FadeState::Hidden,
            opacity: 0.0,
            timing,
            revealed_this_loop: false,
        }
    }

    pub fn phase(&self) -> FadePhase {
        match self.state {
            FadeState::Hidden => FadePhase::Hidden,
            FadeState::FadingIn(_) => FadePhase::FadingIn,
            FadeState::Visible => FadePhase::Visible,
            FadeState::FadingOut(_) => FadePhase::FadingOut,
        }
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn timing(&self) -> &FadeTiming {
        &self.timing
    }

    /// Feed the current playback position `t` of a clip lasting `duration`.
    ///
    /// Does nothing until the duration is known (finite and positive).
    /// Returns the new phase when this call caused a transition.
    pub fn on_playback(&mut self, t: f64, duration: f64) -> Option<FadePhase> {
        if !duration.is_finite() || duration <= 0.0 || !t.is_finite() {
            return None;
        }
        let before = self.phase();

        if t < self.timing.rewind_threshold_sec {
            self.revealed_this_loop = false;
            if matches!(self.state, FadeState::Visible | FadeState::FadingOut(_)) {
                log::debug!("[fade] rewind at t={:.2}s, hiding", t);
                self.state = FadeState::Hidden;
                self.opacity = 0.0;
            }
        }

        let reveal_at = self.timing.reveal_at(duration);
        if t >= reveal_at && !self.revealed_this_loop && self.state == FadeState::Hidden {
            log::debug!("[fade] reveal at t={:.2}s (trigger {:.2}s)", t, reveal_at);
            self.revealed_this_loop = true;
            self.state = FadeState::FadingIn(Tween::new(0.0, 1.0, self.timing.fade_duration));
        }

        let conceal_at = self.timing.conceal_at(duration);
        if t >= conceal_at && self.state == FadeState::Visible {
            log::debug!("[fade] conceal at t={:.2}s (trigger {:.2}s)", t, conceal_at);
            self.state = FadeState::FadingOut(Tween::new(1.0, 0.0, self.timing.fade_duration));
        }

        let after = self.phase();
        (after != before).then_some(after)
    }

    /// Advance an in-flight fade by real elapsed time.
    ///
    /// Returns the settled phase when a fade completes during this call.
    pub fn advance(&mut self, dt: Duration) -> Option<FadePhase> {
        let (step, settled) = match &mut self.state {
            FadeState::FadingIn(tween) => (tween.advance(dt), FadeState::Visible),
            FadeState::FadingOut(tween) => (tween.advance(dt), FadeState::Hidden),
            FadeState::Hidden | FadeState::Visible => return None,
        };
        self.opacity = step.value;
        if !step.done {
            return None;
        }
        self.state = settled;
        self.opacity = self.phase().target_opacity();
        log::debug!("[fade] settled {}", self.phase());
        Some(self.phase())
    }

    /// Back to hidden with opacity 0, forgetting the current loop.
    pub fn reset(&mut self) {
        self.state = FadeState::Hidden;
        self.opacity = 0.0;
        self.revealed_this_loop = false;
    }
}
