//! Integration tests: wire message → normaliser → channel → engine.
//!
//! Each scenario runs the full ingestion path the way a transport
//! listener would drive it, then observes the engine through ticks and
//! snapshots only.

use movinghead::app::channel::{CommandBus, command_channel};
use movinghead::app::service::FixtureService;
use movinghead::config::SimConfig;
use movinghead::proto::{datagram, json, seq_guard::SequenceGuard};

fn make_engine() -> (FixtureService, CommandBus) {
    let (bus, queue) = command_channel();
    (FixtureService::new(SimConfig::default(), queue), bus)
}

/// Push every command of an accepted datagram onto the bus, the way the
/// UDP listener does.
fn submit_datagram(bus: &CommandBus, guard: &SequenceGuard, text: &str) -> bool {
    let (id, commands) = datagram::parse(text).expect("datagram must parse");
    if !guard.accept(id) {
        return false;
    }
    for cmd in commands {
        bus.submit(cmd);
    }
    true
}

// ── Servo convergence ─────────────────────────────────────────

#[test]
fn datagram_retargets_both_axes_and_converges() {
    let (mut engine, bus) = make_engine();
    let guard = SequenceGuard::new();

    assert!(submit_datagram(&bus, &guard, "5;bS=45;tS=120"));

    // At 360 deg/s the worst axis (90 -> 45) needs 125 ms of travel.
    let mut now_ms = 0;
    for _ in 0..60 {
        now_ms += 16;
        engine.tick(now_ms, 0.016);
    }

    let snap = engine.snapshot();
    assert!((snap.base_deg - 45.0).abs() < 1e-3, "base={}", snap.base_deg);
    assert!((snap.top_deg - 120.0).abs() < 1e-3, "top={}", snap.top_deg);
}

// ── Flicker timeline ──────────────────────────────────────────

#[test]
fn flicker_timeline_and_steady_preservation() {
    let (mut engine, bus) = make_engine();
    let guard = SequenceGuard::new();

    // Steady colour starts white; flicker must not commit red over it.
    assert!(submit_datagram(&bus, &guard, "1;r=255;g=0;b=0;fl=500"));

    engine.tick(0, 0.016);
    assert_eq!(engine.snapshot().color, (1.0, 0.0, 0.0)); // bucket 0: red

    engine.tick(480, 0.016);
    assert_eq!(engine.snapshot().color, (0.0, 0.0, 0.0)); // bucket 9: black

    engine.tick(520, 0.016);
    // Flicker expired: back to the pre-flicker steady colour, same tick.
    assert_eq!(engine.snapshot().color, (1.0, 1.0, 1.0));
}

// ── Fade timeline ─────────────────────────────────────────────

#[test]
fn stream_fade_white_to_blue() {
    let (mut engine, bus) = make_engine();

    let commands = json::parse(r#"{"led": {"r": 0, "g": 0, "b": 255}, "fade": 1000}"#).unwrap();
    for cmd in commands {
        bus.submit(cmd);
    }

    engine.tick(0, 0.016);
    assert_eq!(engine.snapshot().color, (1.0, 1.0, 1.0)); // t=0: start exactly

    engine.tick(250, 0.016);
    let f = 0.25f32.powi(4);
    let mid = engine.snapshot().color;
    assert!((mid.0 - (1.0 - f)).abs() < 1e-5);
    assert!((mid.1 - (1.0 - f)).abs() < 1e-5);
    assert!((mid.2 - 1.0).abs() < 1e-5);

    engine.tick(1000, 0.016);
    assert_eq!(engine.snapshot().color, (0.0, 0.0, 1.0)); // t=d: end exactly

    // Completion committed blue as the new steady colour.
    engine.tick(2000, 0.016);
    assert_eq!(engine.snapshot().color, (0.0, 0.0, 1.0));
}

// ── Dedup + reset ─────────────────────────────────────────────

#[test]
fn stale_id_is_dropped_until_reset() {
    let (mut engine, bus) = make_engine();
    let guard = SequenceGuard::new();

    assert!(submit_datagram(&bus, &guard, "5;bS=45"));
    engine.tick(0, 0.25);

    // Packet 3 arrives late: rejected, no commands reach the engine.
    assert!(!submit_datagram(&bus, &guard, "3;bS=170"));
    for i in 1..=20 {
        engine.tick(i * 16, 0.016);
    }
    assert!((engine.snapshot().base_deg - 45.0).abs() < 1e-3);

    // Control endpoint resets the counter; 3 is admissible again.
    guard.reset();
    assert!(submit_datagram(&bus, &guard, "3;bS=170"));
    for i in 21..=60 {
        engine.tick(i * 16, 0.016);
    }
    assert!((engine.snapshot().base_deg - 170.0).abs() < 1e-3);
}

// ── Mixed-transport ordering ──────────────────────────────────

#[test]
fn last_led_command_wins_within_a_tick() {
    let (mut engine, bus) = make_engine();
    let guard = SequenceGuard::new();

    assert!(submit_datagram(&bus, &guard, "1;r=255;g=0;b=0"));
    for cmd in json::parse(r#"{"led": {"g": 255}}"#).unwrap() {
        bus.submit(cmd);
    }

    engine.tick(0, 0.016);
    assert_eq!(engine.snapshot().color, (0.0, 1.0, 0.0));
}
