//! Drawing targets for the renderer.

use pulse_core::{Color, FrameBuffer, PixelFormat, Placement, Size2D};

/// Something frames can be composited onto: a browser canvas, or an
/// in-memory buffer for tests and headless previews.
pub trait Surface {
    /// Image handle type frames are stored as.
    type Image;

    /// Current drawable size in pixels.
    fn size(&self) -> Size2D;

    /// Resize the drawing buffer. Like a canvas, contents are discarded.
    fn set_size(&mut self, width: u32, height: u32);

    /// Paint `color` over the whole surface at `alpha`.
    fn fill(&mut self, color: &Color, alpha: f32);

    /// Draw `image` into `placement` at `alpha`; overhang is clipped.
    fn draw_image(&mut self, image: &Self::Image, placement: &Placement, alpha: f32);
}

/// One recorded draw call on a [`SoftwareSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Fill { color: Color, alpha: f32 },
    Image { placement: Placement, alpha: f32, source: Size2D },
}

/// CPU surface backed by a [`FrameBuffer`]. Keeps a log of draw calls so
/// callers can inspect what was composited, not just the resulting pixels.
#[derive(Debug, Clone)]
pub struct SoftwareSurface {
    buffer: FrameBuffer,
    ops: Vec<DrawOp>,
}

impl SoftwareSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: FrameBuffer::new(width, height, PixelFormat::Rgba8),
            ops: Vec::new(),
        }
    }

    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drain the draw log.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }
}

impl Surface for SoftwareSurface {
    type Image = FrameBuffer;

    fn size(&self) -> Size2D {
        Size2D::from_pixels(self.buffer.width, self.buffer.height)
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.buffer.reset(width, height);
    }

    fn fill(&mut self, color: &Color, alpha: f32) {
        self.buffer.fill_over(color, alpha);
        self.ops.push(DrawOp::Fill {
            color: *color,
            alpha,
        });
    }

    fn draw_image(&mut self, image: &FrameBuffer, placement: &Placement, alpha: f32) {
        self.buffer.draw_scaled(image, placement, alpha);
        self.ops.push(DrawOp::Image {
            placement: *placement,
            alpha,
            source: Size2D::from_pixels(image.width, image.height),
        });
    }
}
