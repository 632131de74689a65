//! Compositing a fractional playback position onto a surface.

use pulse_core::{Color, Placement, PlayerConfig, PulseResult};

use crate::position::{Direction, PlaybackPosition};
use crate::store::FrameStore;
use crate::surface::Surface;

/// What a render call put on the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderOutcome {
    /// Base frame not drawable (not loaded yet, failed, or empty surface).
    Skipped,
    /// Only the base frame was drawn.
    Base { index: usize, placement: Placement },
    /// The base frame plus the neighbour frame at `alpha`.
    Blended {
        base: usize,
        next: usize,
        alpha: f64,
        placement: Placement,
    },
}

impl RenderOutcome {
    pub fn is_drawn(&self) -> bool {
        !matches!(self, RenderOutcome::Skipped)
    }

    /// Opacity of the blend layer; zero when none was drawn.
    pub fn blend_alpha(&self) -> f64 {
        match self {
            RenderOutcome::Blended { alpha, .. } => *alpha,
            _ => 0.0,
        }
    }
}

/// Cover-fits frames and cross-fades between neighbours.
#[derive(Debug, Clone)]
pub struct Renderer {
    trail_color: Color,
    trail_alpha: f32,
    blend: bool,
    blend_epsilon: f64,
}

impl Renderer {
    pub fn new(trail_color: Color, trail_alpha: f32, blend: bool, blend_epsilon: f64) -> Self {
        Self {
            trail_color,
            trail_alpha: trail_alpha.clamp(0.0, 1.0),
            blend,
            blend_epsilon,
        }
    }

    pub fn from_config(config: &PlayerConfig) -> PulseResult<Self> {
        Ok(Self::new(
            config.trail.color()?,
            config.trail.alpha,
            config.blend,
            config.blend_epsilon,
        ))
    }

    /// Opacity the neighbour frame would get at `position`: the fractional
    /// part, or zero when blending is off or the fraction is within epsilon
    /// of a whole frame.
    pub fn blend_alpha(&self, position: PlaybackPosition) -> f64 {
        let fraction = position.fraction();
        if !self.blend || fraction <= self.blend_epsilon {
            0.0
        } else {
            fraction
        }
    }

    /// Draw `position` onto `surface`.
    ///
    /// Frames that are not ready are skipped silently: a missing base frame
    /// draws nothing, a missing neighbour leaves the base frame alone.
    pub fn render<S: Surface>(
        &self,
        surface: &mut S,
        store: &FrameStore<S::Image>,
        position: PlaybackPosition,
        direction: Direction,
    ) -> RenderOutcome {
        let base = position.base_index();
        let Some(frame) = store.get(base) else {
            return RenderOutcome::Skipped;
        };
        let Some(placement) = Placement::cover(surface.size(), frame.size) else {
            return RenderOutcome::Skipped;
        };

        surface.fill(&self.trail_color, self.trail_alpha);
        surface.draw_image(&frame.image, &placement, 1.0);

        let next = position.neighbour(direction);
        let alpha = self.blend_alpha(position);
        if next != base && alpha > 0.0 {
            if let Some(next_frame) = store.get(next) {
                // sequence frames share one intrinsic size, so the base
                // placement is reused
                surface.draw_image(&next_frame.image, &placement, alpha as f32);
                return RenderOutcome::Blended {
                    base,
                    next,
                    alpha,
                    placement,
                };
            }
        }
        RenderOutcome::Base {
            index: base,
            placement,
        }
    }

    /// Resize the surface, then redraw `position` if its base frame is
    /// ready. With no drawable base frame the surface is only resized.
    pub fn resize<S: Surface>(
        &self,
        surface: &mut S,
        store: &FrameStore<S::Image>,
        width: u32,
        height: u32,
        position: PlaybackPosition,
        direction: Direction,
    ) -> RenderOutcome {
        surface.set_size(width, height);
        if !store.is_ready(position.base_index()) {
            return RenderOutcome::Skipped;
        }
        self.render(surface, store, position, direction)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(Color::TRAIL, 0.15, true, 0.02)
    }
}
