//! Unified error types for the simulator core.
//!
//! A single `ParseError` enum covers every way a wire message can be
//! rejected at the normaliser boundary. All variants are `Copy` so the
//! transport listeners can log and discard them without allocation.
//! Rejection never reaches engine state: a message either normalises
//! completely or contributes nothing.

use core::fmt;

// ---------------------------------------------------------------------------
// Normaliser errors
// ---------------------------------------------------------------------------

/// A wire message could not be normalised into commands.
///
/// The transport logs the error, discards the message, and stays open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Datagram payload was empty or whitespace-only.
    EmptyDatagram,
    /// The leading `;`-delimited field is not a valid u32 packet ID.
    InvalidPacketId,
    /// A recognised key carried a value that does not parse.
    InvalidValue { key: &'static str },
    /// An LED channel value fell outside 0..=255.
    ChannelOutOfRange { key: &'static str, value: i64 },
    /// Stream frame was not valid JSON.
    InvalidJson,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDatagram => write!(f, "empty datagram"),
            Self::InvalidPacketId => write!(f, "invalid packet ID"),
            Self::InvalidValue { key } => write!(f, "invalid value for key '{key}'"),
            Self::ChannelOutOfRange { key, value } => {
                write!(f, "channel '{key}' out of range: {value} (expected 0-255)")
            }
            Self::InvalidJson => write!(f, "invalid JSON frame"),
        }
    }
}

impl std::error::Error for ParseError {}
