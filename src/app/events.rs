//! Outbound engine state.
//!
//! The [`FixtureService`](super::service::FixtureService) publishes its
//! integrated state as a [`Snapshot`] once per tick. The renderer on the
//! other side of the boundary maps it onto the 3D scene; the headless
//! binary just logs it.

use crate::light::LinearRgb;

/// A point-in-time view of the fixture, complete for rendering one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    /// Pan angle in degrees.
    pub base_deg: f32,
    /// Tilt angle in degrees.
    pub top_deg: f32,
    /// Displayed LED colour this frame (not necessarily the steady colour —
    /// a running flicker or fade overrides it).
    pub color: LinearRgb,
}
