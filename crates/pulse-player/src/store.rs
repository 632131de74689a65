//! Frame slots of the hero sequence and their load state.

use pulse_core::{AssetPathTemplate, PulseError, Size2D};

/// Starts asynchronous frame fetches.
///
/// `fetch` only begins the request. The outcome is delivered later, as a
/// separate event, through [`FrameStore::complete`] (usually via
/// `HeroPlayer::on_frame_loaded`); implementations must not call back into
/// the store from inside `fetch`.
pub trait FrameFetcher {
    type Image;

    fn fetch(&mut self, index: usize, path: &str);
}

/// A fetched image with its intrinsic pixel size.
#[derive(Debug, Clone)]
pub struct LoadedFrame<I> {
    pub image: I,
    pub width: u32,
    pub height: u32,
}

/// A drawable frame held by the store.
#[derive(Debug, Clone)]
pub struct ReadyFrame<I> {
    pub image: I,
    pub size: Size2D,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    NotRequested,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug)]
enum Slot<I> {
    NotRequested,
    Loading,
    Ready(ReadyFrame<I>),
    Failed,
}

impl<I> Slot<I> {
    fn status(&self) -> FrameStatus {
        match self {
            Slot::NotRequested => FrameStatus::NotRequested,
            Slot::Loading => FrameStatus::Loading,
            Slot::Ready(_) => FrameStatus::Ready,
            Slot::Failed => FrameStatus::Failed,
        }
    }
}

/// Owns every frame of the sequence. The slot count is fixed at creation.
#[derive(Debug)]
pub struct FrameStore<I> {
    slots: Vec<Slot<I>>,
    paths: AssetPathTemplate,
}

impl<I> FrameStore<I> {
    pub fn new(frame_count: usize, paths: AssetPathTemplate) -> Self {
        Self {
            slots: (0..frame_count).map(|_| Slot::NotRequested).collect(),
            paths,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Asset path for a frame index.
    pub fn path_for(&self, index: usize) -> String {
        self.paths.path_for(index)
    }

    /// Begin fetching `index` if it has never been requested.
    ///
    /// Returns `false` for out-of-range indices and for frames that are
    /// already loading or resolved; frames are never fetched twice.
    pub fn request<F>(&mut self, index: usize, fetcher: &mut F) -> bool
    where
        F: FrameFetcher<Image = I>,
    {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        if !matches!(slot, Slot::NotRequested) {
            return false;
        }
        *slot = Slot::Loading;
        let path = self.paths.path_for(index);
        fetcher.fetch(index, &path);
        true
    }

    /// Resolve a loading frame. Returns the new status (`Ready` or `Failed`),
    /// or `None` if `index` was not loading, in which case nothing changes.
    ///
    /// An image reporting a zero dimension cannot be cover-fitted and is
    /// stored as failed.
    pub fn complete(
        &mut self,
        index: usize,
        outcome: Result<LoadedFrame<I>, PulseError>,
    ) -> Option<FrameStatus> {
        let slot = self.slots.get_mut(index)?;
        if !matches!(slot, Slot::Loading) {
            return None;
        }
        *slot = match outcome {
            Ok(frame) if frame.width > 0 && frame.height > 0 => Slot::Ready(ReadyFrame {
                size: Size2D::from_pixels(frame.width, frame.height),
                image: frame.image,
            }),
            Ok(_) => {
                tracing::warn!("frame {} decoded with an empty size", index);
                Slot::Failed
            }
            Err(e) => {
                tracing::warn!("frame {} failed to load: {}", index, e);
                Slot::Failed
            }
        };
        Some(slot.status())
    }

    pub fn status(&self, index: usize) -> Option<FrameStatus> {
        self.slots.get(index).map(Slot::status)
    }

    pub fn is_ready(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(Slot::Ready(_)))
    }

    /// The frame at `index`, only when it is ready.
    pub fn get(&self, index: usize) -> Option<&ReadyFrame<I>> {
        match self.slots.get(index) {
            Some(Slot::Ready(frame)) => Some(frame),
            _ => None,
        }
    }

    pub fn count(&self, status: FrameStatus) -> usize {
        self.slots.iter().filter(|s| s.status() == status).count()
    }
}
