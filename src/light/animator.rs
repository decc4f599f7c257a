//! LED animation engine: steady colour, flicker, fade.
//!
//! Exactly one mode is active at a time. Every LED command fully replaces
//! the running mode, so two animations never overlap. The engine calls
//! [`LightAnimator::evaluate`] once per frame with the current engine time
//! and feeds the returned colour to the renderer.
//!
//! ## Modes
//!
//! | Mode       | Display                                         |
//! |------------|-------------------------------------------------|
//! | Idle       | the committed steady colour                     |
//! | Flickering | base colour on even 50 ms buckets, black on odd |
//! | Fading     | quartic ease-in interpolation start → end       |
//!
//! The steady colour is the fixture's rest state. A flicker never commits
//! it; a fade commits its end colour on completion only.

use crate::app::commands::{PartialRgb8, Rgb8};

use super::LinearRgb;

/// Width of one flicker on/off bucket in milliseconds.
const FLICKER_BUCKET_MS: u64 = 50;

const BLACK: LinearRgb = (0.0, 0.0, 0.0);

/// Which animation mode is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    Idle,
    Flickering,
    Fading,
}

#[derive(Clone, Copy)]
enum Mode {
    Idle,
    Flicker {
        base: LinearRgb,
        /// Absolute engine time at which the flicker stops.
        end_ms: u64,
    },
    Fade {
        start: LinearRgb,
        end: LinearRgb,
        start_ms: u64,
        duration_ms: u32,
    },
}

/// The LED state machine. One per fixture.
pub struct LightAnimator {
    mode: Mode,
    /// Last committed colour; shown while Idle and used as the implicit
    /// fade origin.
    steady: LinearRgb,
}

impl LightAnimator {
    /// Fixture powers on showing white, nothing animating.
    pub fn new() -> Self {
        Self {
            mode: Mode::Idle,
            steady: (1.0, 1.0, 1.0),
        }
    }

    /// The committed rest-state colour (not necessarily what is displayed).
    pub fn steady(&self) -> LinearRgb {
        self.steady
    }

    /// The currently active mode.
    pub fn mode(&self) -> ModeKind {
        match self.mode {
            Mode::Idle => ModeKind::Idle,
            Mode::Flicker { .. } => ModeKind::Flickering,
            Mode::Fade { .. } => ModeKind::Fading,
        }
    }

    // ── Transitions ───────────────────────────────────────────

    /// Commit a steady colour, cancelling any running animation.
    pub fn set_color(&mut self, color: Rgb8) {
        self.steady = to_linear(color);
        self.mode = Mode::Idle;
    }

    /// Start flickering `color` until `now_ms + duration_ms`.
    /// Cancels any active fade. The steady colour is left untouched —
    /// when the flicker expires the fixture returns to it.
    pub fn start_flicker(&mut self, color: Rgb8, duration_ms: u32, now_ms: u64) {
        self.mode = Mode::Flicker {
            base: to_linear(color),
            end_ms: now_ms + u64::from(duration_ms),
        };
    }

    /// Start fading toward `to` over `duration_ms`, beginning at `now_ms`.
    /// Channels absent from `from` start at the current steady colour.
    /// Cancels any active flicker.
    pub fn start_fade(&mut self, to: Rgb8, from: PartialRgb8, duration_ms: u32, now_ms: u64) {
        let start = (
            from.0.map_or(self.steady.0, channel_to_linear),
            from.1.map_or(self.steady.1, channel_to_linear),
            from.2.map_or(self.steady.2, channel_to_linear),
        );
        self.mode = Mode::Fade {
            start,
            end: to_linear(to),
            start_ms: now_ms,
            duration_ms,
        };
    }

    // ── Per-frame evaluation ──────────────────────────────────

    /// Compute the displayed colour for engine time `now_ms`, advancing
    /// mode transitions (flicker expiry, fade completion) as a side effect.
    pub fn evaluate(&mut self, now_ms: u64) -> LinearRgb {
        // A flicker that expires this frame must not leave a dead frame:
        // fall through to the steady colour in the same call.
        if let Mode::Flicker { base, end_ms } = self.mode {
            if now_ms < end_ms {
                return if (now_ms / FLICKER_BUCKET_MS) % 2 == 0 {
                    base
                } else {
                    BLACK
                };
            }
            self.mode = Mode::Idle;
        }

        if let Mode::Fade {
            start,
            end,
            start_ms,
            duration_ms,
        } = self.mode
        {
            let t = now_ms.saturating_sub(start_ms);
            if duration_ms == 0 || t >= u64::from(duration_ms) {
                // Completion commits the end colour as the new rest state.
                self.steady = end;
                self.mode = Mode::Idle;
                return end;
            }
            let f = ease_in_quart(t as f32 / duration_ms as f32);
            return lerp(start, end, f);
        }

        self.steady
    }
}

// ── Colour math ───────────────────────────────────────────────

fn channel_to_linear(v: u8) -> f32 {
    f32::from(v) / 255.0
}

fn to_linear(c: Rgb8) -> LinearRgb {
    (
        channel_to_linear(c.0),
        channel_to_linear(c.1),
        channel_to_linear(c.2),
    )
}

/// Quartic ease-in: slow start, fast finish.
fn ease_in_quart(t: f32) -> f32 {
    t * t * t * t
}

fn lerp(a: LinearRgb, b: LinearRgb, f: f32) -> LinearRgb {
    (
        a.0 + (b.0 - a.0) * f,
        a.1 + (b.1 - a.1) * f,
        a.2 + (b.2 - a.2) * f,
    )
}
