//! Rate-limited servo smoothing.
//!
//! Simple slew limiter: every frame the current angle moves toward the
//! target by at most `rate * dt` degrees, snapping exactly onto the
//! target when it is within reach. No overshoot, no oscillation — the
//! terminal state is `current == target`.

/// Per-axis actuator state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActuatorState {
    current: f32,
    target: f32,
}

impl ActuatorState {
    /// Create an axis parked at `home_deg` (current == target).
    pub fn new(home_deg: f32) -> Self {
        Self {
            current: home_deg,
            target: home_deg,
        }
    }

    /// Instantaneous angle in degrees.
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Commanded angle in degrees.
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Retarget the axis. Takes effect over subsequent [`advance`] calls.
    ///
    /// [`advance`]: Self::advance
    pub fn set_target(&mut self, angle_deg: f32) {
        self.target = angle_deg;
    }

    /// Advance the axis by one frame of `dt_secs` at `rate_deg_per_sec`.
    ///
    /// Snaps onto the target once it is within `rate * dt` degrees, so
    /// the axis never overshoots and never dithers around the target.
    pub fn advance(&mut self, dt_secs: f32, rate_deg_per_sec: f32) {
        let delta = self.target - self.current;
        let step = rate_deg_per_sec * dt_secs;
        if delta.abs() <= step {
            self.current = self.target;
        } else {
            self.current += step.copysign(delta);
        }
    }
}
