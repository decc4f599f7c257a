//! Moving head light simulator library.
//!
//! Command ingestion and actuator/lighting state engine for a two-axis
//! moving-head stage light. Transport listeners normalise wire messages
//! into canonical commands and push them onto a shared channel; a single
//! consumer drains the channel once per frame and advances servo and LED
//! state deterministically. The renderer (out of scope here) drives
//! [`app::service::FixtureService::tick`] once per frame and reads the
//! resulting [`app::events::Snapshot`].

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod light;
pub mod net;
pub mod proto;
