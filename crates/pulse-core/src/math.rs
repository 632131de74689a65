use serde::{Deserialize, Serialize};

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

impl Default for Point2D {
    fn default() -> Self {
        Self::zero()
    }
}

/// A 2D size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size2D {
    pub width: f64,
    pub height: f64,
}

impl Size2D {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Build from integer pixel dimensions.
    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self::new(width as f64, height as f64)
    }

    /// True when either side is zero (or negative), i.e. nothing can be drawn.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Where a frame lands on the surface: origin plus drawn size.
///
/// The origin may be negative on one axis; the overhang is cropped by the
/// surface, which is how cover fitting crops.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub origin: Point2D,
    pub size: Size2D,
}

impl Placement {
    /// Cover-fit `frame` into `surface`: uniform scale so the frame fully
    /// covers the surface, centered, with the excess cropped equally from
    /// both sides ("background-size: cover").
    ///
    /// Returns `None` when either size is empty.
    pub fn cover(surface: Size2D, frame: Size2D) -> Option<Placement> {
        if surface.is_empty() || frame.is_empty() {
            return None;
        }
        let scale = (surface.width / frame.width).max(surface.height / frame.height);
        let size = Size2D::new(frame.width * scale, frame.height * scale);
        let origin = Point2D::new(
            (surface.width - size.width) / 2.0,
            (surface.height - size.height) / 2.0,
        );
        Some(Placement { origin, size })
    }

    /// Whether the placement covers every pixel of `surface`.
    pub fn covers(&self, surface: Size2D) -> bool {
        const SLACK: f64 = 1e-9;
        self.origin.x <= SLACK
            && self.origin.y <= SLACK
            && self.origin.x + self.size.width >= surface.width - SLACK
            && self.origin.y + self.size.height >= surface.height - SLACK
    }

    /// Integer pixel rectangle `(x0, y0, x1, y1)` of this placement clipped to a
    /// `width` x `height` surface, or `None` when nothing is visible.
    pub fn clip_to(&self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let x0 = self.origin.x.max(0.0).floor();
        let y0 = self.origin.y.max(0.0).floor();
        let x1 = (self.origin.x + self.size.width).min(width as f64).ceil();
        let y1 = (self.origin.y + self.size.height).min(height as f64).ceil();
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}
