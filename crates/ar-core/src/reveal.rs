//! Linear time interpolation used for opacity fades.

use std::time::Duration;

/// Result of sampling an interpolation at some elapsed time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interpolated {
    pub value: f32,
    pub done: bool,
}

/// Interpolate from `from` to `to` after `elapsed_ms` of a `duration_sec` fade.
///
/// Progress is clamped to \[0, 1\], so the value never leaves the
/// `[from, to]` range no matter how far past the end `elapsed_ms` is.
/// A zero or negative duration completes immediately.
pub fn interpolate(from: f32, to: f32, elapsed_ms: f64, duration_sec: f64) -> Interpolated {
    let progress = if duration_sec > 0.0 {
        (elapsed_ms / (duration_sec * 1000.0)).clamp(0.0, 1.0)
    } else {
        1.0
    };
    // NaN elapsed counts as not started
    let progress = if progress.is_nan() { 0.0 } else { progress };
    if progress >= 1.0 {
        return Interpolated {
            value: to,
            done: true,
        };
    }
    let value = from + (to - from) * progress as f32;
    Interpolated {
        value: value.clamp(from.min(to), from.max(to)),
        done: false,
    }
}

/// A running interpolation advanced by frame deltas.
///
/// The owner calls [`Tween::advance`] once per tick; there is no
/// self-scheduling. Once done, further advances keep returning `to`.
#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: Duration,
    elapsed: Duration,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
        }
    }

    pub fn advance(&mut self, dt: Duration) -> Interpolated {
        self.elapsed = self.elapsed.saturating_add(dt);
        self.sample()
    }

    pub fn sample(&self) -> Interpolated {
        interpolate(
            self.from,
            self.to,
            self.elapsed.as_secs_f64() * 1000.0,
            self.duration.as_secs_f64(),
        )
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}
