//! # pulse-player
//!
//! The hero image-sequence player. Frames are fetched in ordered batches
//! into a [`FrameStore`], a [`Scheduler`] advances a fractional playback
//! position that ping-pongs between the first and last frame, and a
//! [`Renderer`] cover-fits the current frame onto a [`Surface`], cross-fading
//! the neighbouring frame in proportion to the fractional progress.
//!
//! Nothing here touches a clock, a network or a window: fetch completions,
//! ticks and resizes are explicit calls, so the host (the browser binding or
//! a test) decides when they happen.

pub mod image_loader;
pub mod loader;
pub mod player;
pub mod position;
pub mod renderer;
pub mod scheduler;
pub mod store;
pub mod surface;

pub use loader::{BatchPlan, LoadEvent, Loader};
pub use player::{HeroPlayer, PlayerSignal};
pub use position::{Direction, PlaybackPosition};
pub use renderer::{RenderOutcome, Renderer};
pub use scheduler::{Scheduler, SchedulerState, TickFrame};
pub use store::{FrameFetcher, FrameStatus, FrameStore, LoadedFrame, ReadyFrame};
pub use surface::{DrawOp, SoftwareSurface, Surface};
