use serde::{Deserialize, Serialize};

use crate::math::Placement;
use crate::Color;

/// Pixel format of a frame buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 8-bit RGBA (4 bytes per pixel).
    Rgba8,
    /// 8-bit RGB (3 bytes per pixel, no alpha).
    Rgb8,
}

impl PixelFormat {
    /// Bytes per pixel for this format.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Rgba8 => 4,
            PixelFormat::Rgb8 => 3,
        }
    }
}

/// A raw pixel buffer: either a decoded hero frame or the software surface
/// frames are composited onto.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    /// Raw pixel data, row-major.
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
}

impl FrameBuffer {
    /// Create a new frame buffer filled with zeros (transparent black).
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let size = (width as usize) * (height as usize) * format.bytes_per_pixel();
        Self {
            data: vec![0u8; size],
            width,
            height,
            format,
        }
    }

    /// Create an RGBA frame buffer filled with a solid color.
    pub fn solid(width: u32, height: u32, color: &Color) -> Self {
        let pixel = color.to_rgba8();
        let pixel_count = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(pixel_count * 4);
        for _ in 0..pixel_count {
            data.extend_from_slice(&pixel);
        }
        Self {
            data,
            width,
            height,
            format: PixelFormat::Rgba8,
        }
    }

    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Get the RGBA value at a pixel coordinate. Returns None if out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = self.offset(x, y);
        let d = &self.data;
        match self.format {
            PixelFormat::Rgba8 => Some([d[offset], d[offset + 1], d[offset + 2], d[offset + 3]]),
            PixelFormat::Rgb8 => Some([d[offset], d[offset + 1], d[offset + 2], 255]),
        }
    }

    /// Set the RGBA value at a pixel coordinate. No-op if out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let offset = self.offset(x, y);
        let n = self.format.bytes_per_pixel();
        self.data[offset..offset + n].copy_from_slice(&rgba[..n]);
    }

    /// Resize the buffer, discarding its contents (same as assigning a
    /// canvas's width/height).
    pub fn reset(&mut self, width: u32, height: u32) {
        *self = FrameBuffer::new(width, height, self.format);
    }

    /// Blend `color` at `opacity` over every pixel.
    pub fn fill_over(&mut self, color: &Color, opacity: f32) {
        let src = color.with_alpha(color.a * opacity).to_rgba8();
        if src[3] == 0 {
            return;
        }
        for y in 0..self.height {
            for x in 0..self.width {
                self.blend_at(x, y, src);
            }
        }
    }

    /// Draw `src` scaled into `placement` (nearest-neighbor), multiplying its
    /// alpha by `opacity`. Pixels outside this buffer are clipped.
    pub fn draw_scaled(&mut self, src: &FrameBuffer, placement: &Placement, opacity: f32) {
        if opacity <= 0.0 || src.width == 0 || src.height == 0 {
            return;
        }
        let Some((x0, y0, x1, y1)) = placement.clip_to(self.width, self.height) else {
            return;
        };
        let sx = src.width as f64 / placement.size.width;
        let sy = src.height as f64 / placement.size.height;
        let opacity = opacity.clamp(0.0, 1.0);

        for y in y0..y1 {
            let v = ((y as f64 + 0.5 - placement.origin.y) * sy).floor();
            let src_y = (v.max(0.0) as u32).min(src.height - 1);
            for x in x0..x1 {
                let u = ((x as f64 + 0.5 - placement.origin.x) * sx).floor();
                let src_x = (u.max(0.0) as u32).min(src.width - 1);
                let Some(mut px) = src.get_pixel(src_x, src_y) else {
                    continue;
                };
                px[3] = (px[3] as f32 * opacity).round() as u8;
                if px[3] > 0 {
                    self.blend_at(x, y, px);
                }
            }
        }
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * self.format.bytes_per_pixel()
    }

    /// Source-over blend of one straight-alpha pixel.
    fn blend_at(&mut self, x: u32, y: u32, src: [u8; 4]) {
        let Some(dst) = self.get_pixel(x, y) else {
            return;
        };
        let sa = src[3] as u32;
        if sa == 255 {
            self.set_pixel(x, y, src);
            return;
        }
        let da = dst[3] as u32;
        let inv_sa = 255 - sa;
        let out_a = sa + (da * inv_sa) / 255;
        if out_a == 0 {
            return;
        }
        let mix = |s: u8, d: u8| {
            ((s as u32 * sa * 255 + d as u32 * da * inv_sa) / (out_a * 255)) as u8
        };
        self.set_pixel(
            x,
            y,
            [
                mix(src[0], dst[0]),
                mix(src[1], dst[1]),
                mix(src[2], dst[2]),
                out_a as u8,
            ],
        );
    }
}
