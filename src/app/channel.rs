//! Command hand-off channel between transport listeners and the engine.
//!
//! Multi-producer, single-consumer, unbounded. Every transport listener
//! holds a clone of [`CommandBus`] and pushes normalised commands; the
//! engine owns the single [`CommandQueue`] and drains it once per tick.
//!
//! ```text
//! ┌──────────────┐   Command   ┌───────────────┐
//! │  Listeners   │────────────▶│  FixtureService│
//! │  (async)     │  unbounded  │  tick (sync)   │
//! └──────────────┘             └───────────────┘
//! ```
//!
//! `submit` never blocks the producer; order is FIFO per producer. The
//! queue is bounded only by memory, which is acceptable here: command
//! rates are human-scale and the consumer drains every frame.

use log::warn;
use tokio::sync::mpsc;

use super::commands::Command;

/// Create a connected bus/queue pair.
pub fn command_channel() -> (CommandBus, CommandQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (CommandBus { tx }, CommandQueue { rx })
}

/// Producer handle, cloned into every transport listener.
#[derive(Clone)]
pub struct CommandBus {
    tx: mpsc::UnboundedSender<Command>,
}

impl CommandBus {
    /// Enqueue a command for the engine. Never blocks.
    ///
    /// A send can only fail once the engine consumer is gone, which means
    /// the process is shutting down — the command is dropped with a warning.
    pub fn submit(&self, cmd: Command) {
        if self.tx.send(cmd).is_err() {
            warn!("engine consumer gone, dropping command {cmd:?}");
        }
    }
}

/// Consumer handle, owned exclusively by the engine.
pub struct CommandQueue {
    rx: mpsc::UnboundedReceiver<Command>,
}

impl CommandQueue {
    /// Pop the next queued command without blocking.
    ///
    /// Returns `None` when the queue is momentarily empty. Commands
    /// submitted concurrently with a drain land in this tick or the next;
    /// either way they pass through this queue, so consumption stays
    /// linearisable.
    pub fn try_next(&mut self) -> Option<Command> {
        self.rx.try_recv().ok()
    }
}
