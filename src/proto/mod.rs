//! Wire protocol normalisers.
//!
//! Two wire encodings reach the fixture, one per transport:
//!
//! ```text
//! Datagram (UDP):
//! ┌───────────┬──────────────────────────────────────────┐
//! │ packet ID │ ;key=value;key=value;...                 │
//! │ (u32)     │ bS tS  r g b  fl  fa  fr fg fb           │
//! └───────────┴──────────────────────────────────────────┘
//!
//! Stream (WebSocket), one JSON object per frame:
//!   {"servo": "top", "angle": 45}
//!   {"servo": [{"servo": "base", "angle": 10}, ...]}
//!   {"led": {"r": 255, "g": 0, "b": 0}}
//!   {"led": {...}, "flicker": 500}
//!   {"led": {...}, "fade": 1000, "from": {"r": 0}}
//! ```
//!
//! Each normaliser turns one inbound message into zero or more
//! [`Command`](crate::app::commands::Command)s or fails with a
//! [`ParseError`](crate::error::ParseError) that the transport logs and
//! discards. The datagram path additionally runs every packet ID through
//! the [`seq_guard::SequenceGuard`] before any command is forwarded.

pub mod datagram;
pub mod json;
pub mod seq_guard;
