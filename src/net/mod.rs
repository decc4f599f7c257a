//! Transport listeners — the async I/O side of the simulator.
//!
//! Runs in a dedicated thread hosting a current-thread tokio runtime
//! with one task per listener. Listeners never touch engine state: they
//! normalise inbound messages and push commands through the
//! [`CommandBus`](crate::app::channel::CommandBus).
//!
//! ```text
//!  ┌─────────────────────────────────────────────────────┐
//!  │  I/O thread (tokio current-thread runtime)          │
//!  │                                                     │
//!  │  ┌──────────┐  ┌─────────────┐  ┌───────────────┐   │
//!  │  │ Datagram │  │  Stream     │  │ Control       │   │
//!  │  │ UDP:1234 │  │  WS:81 /ws  │  │ HTTP:8081     │   │
//!  │  └────┬─────┘  └──────┬──────┘  └──────┬────────┘   │
//!  │       └───────────────┴── CommandBus ──┘            │
//!  └─────────────────────────────────────────────────────┘
//! ```
//!
//! A listener that cannot bind its socket logs the failure and ends
//! alone; the other listeners and the engine tick loop keep running.

pub mod http;
pub mod udp;
pub mod ws;

use std::sync::Arc;
use std::thread;

use anyhow::Result;
use log::{error, info};

use crate::app::channel::CommandBus;
use crate::config::SimConfig;
use crate::proto::seq_guard::SequenceGuard;

/// Spawn the I/O thread with all three transport listeners.
///
/// The returned handle never joins in normal operation — the listeners
/// run until process shutdown.
pub fn spawn(
    config: SimConfig,
    bus: CommandBus,
    guard: Arc<SequenceGuard>,
) -> Result<thread::JoinHandle<()>> {
    let handle = thread::Builder::new()
        .name("net-io".into())
        .spawn(move || run_io_loop(config, bus, guard))?;
    Ok(handle)
}

fn run_io_loop(config: SimConfig, bus: CommandBus, guard: Arc<SequenceGuard>) {
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!("failed to build I/O runtime: {e}");
            return;
        }
    };

    rt.block_on(async {
        tokio::spawn(udp::serve(config.clone(), bus.clone(), Arc::clone(&guard)));
        tokio::spawn(ws::serve(config.clone(), bus));
        tokio::spawn(http::serve(config, guard));

        info!("I/O task started (datagram, stream, control listeners)");

        // The listeners run forever; park this future so the runtime
        // keeps driving them.
        core::future::pending::<()>().await;
    });
}
