//! Fixture service — the engine core.
//!
//! [`FixtureService`] owns all mutable simulator state: both actuator
//! axes, the LED animator, and the consumer end of the command channel.
//! It is single-threaded by construction — listeners reach it only
//! through [`CommandBus`](super::channel::CommandBus).
//!
//! ```text
//!  CommandQueue ──▶ ┌────────────────────────┐ ──▶ Snapshot
//!                   │     FixtureService      │
//!                   │  smoother · animator    │
//!                   └────────────────────────┘
//! ```
//!
//! `tick` must stay non-blocking and I/O-free: the renderer calls it once
//! per frame and reads the snapshot immediately after.

use log::{debug, info};

use crate::config::SimConfig;
use crate::control::smoother::ActuatorState;
use crate::light::LinearRgb;
use crate::light::animator::LightAnimator;

use super::channel::CommandQueue;
use super::commands::{Axis, Command};
use super::events::Snapshot;

/// The engine: integrates queued commands into fixture state each frame.
pub struct FixtureService {
    config: SimConfig,
    queue: CommandQueue,
    base: ActuatorState,
    top: ActuatorState,
    light: LightAnimator,
    /// Colour evaluated on the most recent tick.
    displayed: LinearRgb,
    tick_count: u64,
}

impl FixtureService {
    /// Construct the engine around the consumer end of the command channel.
    /// Both axes park at the configured home angle; the LED shows white.
    pub fn new(config: SimConfig, queue: CommandQueue) -> Self {
        let home = config.home_angle_deg;
        let light = LightAnimator::new();
        let displayed = light.steady();
        Self {
            config,
            queue,
            base: ActuatorState::new(home),
            top: ActuatorState::new(home),
            light,
            displayed,
            tick_count: 0,
        }
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one frame: drain commands, slew the axes, evaluate the LED.
    ///
    /// `now_ms` is absolute engine time; `dt_secs` is the wall-clock time
    /// since the previous tick as measured by the caller. dt is clamped to
    /// `max_frame_dt_secs` so a stalled frame cannot teleport the head.
    pub fn tick(&mut self, now_ms: u64, dt_secs: f32) {
        self.tick_count += 1;

        // 1. Drain every queued command, in arrival order. Each command
        //    applies completely or not at all.
        while let Some(cmd) = self.queue.try_next() {
            self.apply(cmd, now_ms);
        }

        // 2. Slew both axes with the clamped dt.
        let dt = dt_secs.clamp(0.0, self.config.max_frame_dt_secs);
        let rate = self.config.servo_rate_deg_per_sec;
        self.base.advance(dt, rate);
        self.top.advance(dt, rate);

        // 3. Evaluate the LED state machine at this frame's time.
        self.displayed = self.light.evaluate(now_ms);
    }

    /// The state produced by the most recent [`tick`](Self::tick).
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            base_deg: self.base.current(),
            top_deg: self.top.current(),
            color: self.displayed,
        }
    }

    /// Total ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // ── Command handling ──────────────────────────────────────

    fn apply(&mut self, cmd: Command, now_ms: u64) {
        match cmd {
            Command::Servo { axis, angle_deg } => {
                debug!("moving {axis:?} servo to {angle_deg}°");
                match axis {
                    Axis::Base => self.base.set_target(angle_deg),
                    Axis::Top => self.top.set_target(angle_deg),
                }
            }
            Command::LedSet { color } => {
                info!("setting LED to RGB{color:?}");
                self.light.set_color(color);
            }
            Command::LedFlicker { color, duration_ms } => {
                info!("flickering LED RGB{color:?} for {duration_ms} ms");
                self.light.start_flicker(color, duration_ms, now_ms);
            }
            Command::LedFade {
                to,
                from,
                duration_ms,
            } => {
                info!("fading LED to RGB{to:?} over {duration_ms} ms");
                self.light.start_fade(to, from, duration_ms, now_ms);
            }
        }
    }
}
