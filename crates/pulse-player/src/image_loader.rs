//! Native frame loading: decodes sequence frames from disk into
//! FrameBuffers, for headless previews and tests.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use pulse_core::frame::FrameBuffer;
use pulse_core::{PixelFormat, PulseError, PulseResult};

use crate::store::{FrameFetcher, LoadedFrame};

/// Decode an image file (JPEG, PNG, WebP...) into an RGBA frame.
pub fn load_frame(path: &Path) -> PulseResult<LoadedFrame<FrameBuffer>> {
    let img = image::open(path)
        .map_err(|e| PulseError::Decode(format!("'{}': {}", path.display(), e)))?;
    Ok(into_frame(img))
}

/// Decode an in-memory image.
pub fn load_frame_from_bytes(data: &[u8]) -> PulseResult<LoadedFrame<FrameBuffer>> {
    let img = image::load_from_memory(data)
        .map_err(|e| PulseError::Decode(format!("<memory>: {}", e)))?;
    Ok(into_frame(img))
}

/// Opaque sources (JPEG sequences) stay RGB.
fn into_frame(img: image::DynamicImage) -> LoadedFrame<FrameBuffer> {
    let (width, height) = (img.width(), img.height());
    let fb = if img.color().has_alpha() {
        let mut fb = FrameBuffer::new(width, height, PixelFormat::Rgba8);
        fb.data = img.to_rgba8().into_raw();
        fb
    } else {
        let mut fb = FrameBuffer::new(width, height, PixelFormat::Rgb8);
        fb.data = img.to_rgb8().into_raw();
        fb
    };
    LoadedFrame {
        image: fb,
        width,
        height,
    }
}

/// Fetches frames from a directory. Decoding happens during `fetch`, but the
/// results are queued and only handed over by [`drain`](Self::drain), so
/// completions still arrive as separate events like they do in a browser.
#[derive(Debug, Default)]
pub struct DiskFetcher {
    root: PathBuf,
    completed: VecDeque<(usize, PulseResult<LoadedFrame<FrameBuffer>>)>,
}

impl DiskFetcher {
    /// Asset paths are resolved relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            completed: VecDeque::new(),
        }
    }

    /// Take every completion queued so far, in request order.
    pub fn drain(&mut self) -> Vec<(usize, PulseResult<LoadedFrame<FrameBuffer>>)> {
        self.completed.drain(..).collect()
    }

    pub fn pending(&self) -> usize {
        self.completed.len()
    }
}

impl FrameFetcher for DiskFetcher {
    type Image = FrameBuffer;

    fn fetch(&mut self, index: usize, path: &str) {
        let full = self.root.join(path);
        let outcome = load_frame(&full).map_err(|e| PulseError::fetch(index, path, e.to_string()));
        self.completed.push_back((index, outcome));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_frame_missing_file() {
        let result = load_frame(Path::new("/nonexistent/Gif_000.jpg"));
        assert!(matches!(result, Err(PulseError::Decode(_))));
    }

    #[test]
    fn test_load_frame_from_bytes_png() {
        let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        let frame = load_frame_from_bytes(&bytes).unwrap();
        assert_eq!((frame.width, frame.height), (3, 2));
        assert_eq!(frame.image.get_pixel(2, 1), Some([10, 20, 30, 255]));
    }

    #[test]
    fn test_opaque_source_stays_rgb() {
        let img = image::RgbImage::from_pixel(4, 2, image::Rgb([200, 100, 50]));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        let frame = load_frame_from_bytes(&bytes).unwrap();
        assert_eq!(frame.image.format, PixelFormat::Rgb8);
        assert_eq!(frame.image.data.len(), 4 * 2 * 3);
        assert_eq!(frame.image.get_pixel(3, 1), Some([200, 100, 50, 255]));
    }

    #[test]
    fn test_load_frame_from_garbage() {
        assert!(load_frame_from_bytes(b"not an image").is_err());
    }

    #[test]
    fn test_disk_fetcher_queues_failures() {
        let mut fetcher = DiskFetcher::new("/nonexistent");
        fetcher.fetch(47, "Gif-Images/Gif_047.jpg");
        assert_eq!(fetcher.pending(), 1);
        let done = fetcher.drain();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].0, 47);
        assert!(matches!(&done[0].1, Err(PulseError::Fetch { index: 47, .. })));
        assert_eq!(fetcher.pending(), 0);
    }
}
