//! Core 2-D ambient and burst particle layer.
//!
//! Main components:
//! - [`store`] — the bounded live particle set.
//! - [`simulation`] — the per-tick advance, draw, cull and replenish pipeline.
//! - [`frame_loop`] — start/stop controller driven by the host refresh.
//! - [`particle`] — particle state and spawn sampling.
//! - [`config`] — tunables, TOML loading and validation.
//! - [`surface`] — the drawing surface trait and a recording surface.
//! - [`random`] — injectable random source.
//! - [`color`] — palette colors and alpha packing.
//! - [`error`] — config errors.
//! - [`types`] — viewport and particle kind.

pub mod color;
pub mod config;
pub mod error;
pub mod frame_loop;
pub mod particle;
pub mod random;
pub mod simulation;
pub mod store;
pub mod surface;
pub mod types;
