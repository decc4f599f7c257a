//! Inbound commands to the engine.
//!
//! These are the canonical, already-validated instructions that the
//! protocol normalisers in [`crate::proto`] produce from wire messages.
//! The [`FixtureService`](super::service::FixtureService) interprets them;
//! nothing downstream of the normaliser ever sees raw wire data.

/// Colour as (R, G, B) tuple, each 0–255. Validated at the wire boundary.
pub type Rgb8 = (u8, u8, u8);

/// Per-channel optional colour, used for the fade "from" override.
/// Channels left as `None` fall back to the current steady colour when
/// the fade is applied.
pub type PartialRgb8 = (Option<u8>, Option<u8>, Option<u8>);

/// One of the two rotational degrees of freedom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Pan (the rotating base).
    Base,
    /// Tilt (the head on top of the yoke).
    Top,
}

impl Axis {
    /// Map a wire-level axis name onto an axis.
    ///
    /// Unknown names return `None` and are ignored by the normalisers —
    /// future hardware revisions may add axes this engine does not drive.
    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "base" => Some(Self::Base),
            "top" => Some(Self::Top),
            _ => None,
        }
    }
}

/// Canonical command, one per discrete actuation the wire can request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Retarget one servo axis. The smoother slews toward it over
    /// subsequent frames; the command itself is instantaneous.
    Servo { axis: Axis, angle_deg: f32 },

    /// Commit a steady LED colour, cancelling any running animation.
    LedSet { color: Rgb8 },

    /// Strobe between `color` and black until `duration_ms` has elapsed.
    LedFlicker { color: Rgb8, duration_ms: u32 },

    /// Fade to `to` over `duration_ms`. Channels absent from `from` start
    /// at the current steady colour.
    LedFade {
        to: Rgb8,
        from: PartialRgb8,
        duration_ms: u32,
    },
}
