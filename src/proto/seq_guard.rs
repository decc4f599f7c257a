//! Datagram sequence guard.
//!
//! UDP delivers packets duplicated and out of order; the guard keeps a
//! process-wide high-water mark of accepted packet IDs. A packet is
//! accepted iff its ID is strictly greater than every previously accepted
//! ID — late arrivals are dropped, not reordered. The control endpoint
//! can reset the mark so senders may restart their counter from 1.
//!
//! `accept` and `reset` may race (datagram listener vs. control
//! endpoint); a compare-and-swap loop on the atomic serialises them.

use std::sync::atomic::{AtomicU32, Ordering};

/// Monotonic packet-ID filter for the datagram transport.
pub struct SequenceGuard {
    last_accepted: AtomicU32,
}

impl SequenceGuard {
    /// A fresh guard accepts any ID greater than zero.
    pub fn new() -> Self {
        Self {
            last_accepted: AtomicU32::new(0),
        }
    }

    /// Accept `id` iff it is strictly greater than the high-water mark,
    /// advancing the mark on success.
    pub fn accept(&self, id: u32) -> bool {
        self.last_accepted
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                (id > last).then_some(id)
            })
            .is_ok()
    }

    /// Reset the high-water mark to zero, re-admitting previously seen IDs.
    pub fn reset(&self) {
        self.last_accepted.store(0, Ordering::SeqCst);
    }

    /// The highest accepted ID since the last reset (0 if none).
    pub fn last_accepted(&self) -> u32 {
        self.last_accepted.load(Ordering::SeqCst)
    }
}

impl Default for SequenceGuard {
    fn default() -> Self {
        Self::new()
    }
}
