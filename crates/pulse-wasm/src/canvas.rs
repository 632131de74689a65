//! The hero `<canvas>` as a drawing surface.

use pulse_core::{Color, Placement, Size2D};
use pulse_player::Surface;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Look up canvas `id` and its 2d context; `None` if either is missing.
    pub fn find(document: &Document, id: &str) -> Option<Self> {
        let canvas = document
            .get_element_by_id(id)?
            .dyn_into::<HtmlCanvasElement>()
            .ok()?;
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Surface for CanvasSurface {
    type Image = HtmlImageElement;

    fn size(&self) -> Size2D {
        Size2D::from_pixels(self.canvas.width(), self.canvas.height())
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn fill(&mut self, color: &Color, alpha: f32) {
        self.ctx.set_global_alpha(alpha as f64);
        self.ctx.set_fill_style_str(&color.to_css_rgb());
        self.ctx.fill_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
        self.ctx.set_global_alpha(1.0);
    }

    fn draw_image(&mut self, image: &HtmlImageElement, placement: &Placement, alpha: f32) {
        self.ctx.set_global_alpha(alpha as f64);
        if let Err(e) = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
            image,
            placement.origin.x,
            placement.origin.y,
            placement.size.width,
            placement.size.height,
        ) {
            tracing::warn!("drawImage failed: {:?}", e);
        }
        self.ctx.set_global_alpha(1.0);
    }
}
