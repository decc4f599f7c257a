//! Simulator configuration parameters
//!
//! All tunable parameters for the moving head simulator.
//! Ports and motion limits can be overridden by embedders before the
//! listeners and engine are constructed.

use serde::{Deserialize, Serialize};

/// Core simulator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    // --- Transports ---
    /// Address the listeners bind to
    pub bind_addr: String,
    /// Datagram (UDP) command port
    pub udp_port: u16,
    /// WebSocket stream command port
    pub ws_port: u16,
    /// HTTP control endpoint port
    pub http_port: u16,

    // --- Motion ---
    /// Home position for both axes (degrees)
    pub home_angle_deg: f32,
    /// Maximum servo slew rate (degrees per second)
    pub servo_rate_deg_per_sec: f32,

    // --- Timing ---
    /// Upper bound on the per-frame dt fed to the smoother (seconds).
    /// A stalled render frame is clamped to this so the head cannot
    /// teleport when the renderer catches up.
    pub max_frame_dt_secs: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            // Transports (ports match the original fixture firmware)
            bind_addr: "0.0.0.0".to_string(),
            udp_port: 1234,
            ws_port: 81,
            http_port: 8081,

            // Motion
            home_angle_deg: 90.0,
            servo_rate_deg_per_sec: 360.0,

            // Timing
            max_frame_dt_secs: 0.25,
        }
    }
}
