//! # pulse-core
//!
//! Core types and primitives for the Pulse hero player.
//! This crate contains foundational types shared across all Pulse crates:
//! frame buffers, colors, geometry, time, configuration, and error types,
//! plus the small amount of logic behind the landing page's promo widgets.

pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod hash;
pub mod math;
pub mod promo;
pub mod time;

pub use config::*;

pub use color::Color;
pub use error::{PulseError, PulseResult};
pub use frame::{FrameBuffer, PixelFormat};
pub use math::{Placement, Point2D, Size2D};
pub use time::{Duration, Timestamp};
