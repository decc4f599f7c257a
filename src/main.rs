//! Moving Head Light Simulator — Main Entry Point
//!
//! Headless stand-in for the renderer: bootstraps the transport
//! listeners, then drives the engine tick loop at ~60 Hz and logs the
//! snapshot periodically. A real renderer would call `tick` + `snapshot`
//! from its frame loop instead; everything else stays identical.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │  net-io thread          │  main thread                 │
//! │  UDP · WS · HTTP        │  FixtureService tick @ 60 Hz │
//! │  listeners ── CommandBus ──▶ drain → slew → evaluate   │
//! └────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use log::info;

use movinghead::app::channel::command_channel;
use movinghead::app::commands::Command;
use movinghead::app::service::FixtureService;
use movinghead::config::SimConfig;
use movinghead::net;
use movinghead::proto::seq_guard::SequenceGuard;

/// Target frame interval (~60 Hz).
const FRAME: Duration = Duration::from_micros(16_667);

/// How often the headless loop logs a snapshot.
const REPORT_EVERY: Duration = Duration::from_secs(5);

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    tracing_subscriber::fmt().compact().init();

    info!("**************************");
    info!("    Moving Head Light     ");
    info!("**************************");
    info!("simulator v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Engine + channel + guard ───────────────────────────
    let config = SimConfig::default();
    let (bus, queue) = command_channel();
    let guard = Arc::new(SequenceGuard::new());
    let mut service = FixtureService::new(config.clone(), queue);

    // ── 3. Transport listeners ────────────────────────────────
    let _io = net::spawn(config, bus.clone(), guard)?;

    // Boot light cue: the fixture flashes green once it is operational.
    bus.submit(Command::LedFlicker {
        color: (0, 255, 0),
        duration_ms: 1000,
    });
    info!("operational");

    // ── 4. Render stand-in loop ───────────────────────────────
    let start = Instant::now();
    let mut prev = start;
    let mut last_report = start;

    loop {
        thread::sleep(FRAME);

        let now = Instant::now();
        let dt_secs = now.duration_since(prev).as_secs_f32();
        prev = now;
        let now_ms = now.duration_since(start).as_millis() as u64;

        service.tick(now_ms, dt_secs);

        if now.duration_since(last_report) >= REPORT_EVERY {
            last_report = now;
            let snap = service.snapshot();
            info!(
                "base={:.1}° top={:.1}° rgb=({:.2}, {:.2}, {:.2})",
                snap.base_deg, snap.top_deg, snap.color.0, snap.color.1, snap.color.2
            );
        }
    }
}
