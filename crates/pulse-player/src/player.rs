//! The hero component: store, loader, renderer and scheduler wired together.

use pulse_core::{Duration, PlayerConfig, PulseError, PulseResult, Timestamp};

use crate::loader::{BatchPlan, LoadEvent, Loader};
use crate::renderer::{RenderOutcome, Renderer};
use crate::scheduler::Scheduler;
use crate::store::{FrameFetcher, FrameStore, LoadedFrame};
use crate::surface::Surface;

/// Work the host must schedule on the player's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerSignal {
    /// The scheduler is now running; begin delivering display ticks.
    StartPlayback,
    /// Call [`HeroPlayer::load_next_batch`] after `delay`.
    ScheduleNextBatch { delay: Duration },
}

/// One hero canvas and its frame sequence.
///
/// The host owns the event loop and calls in for each event:
/// [`boot`](Self::boot) once the page is ready,
/// [`on_frame_loaded`](Self::on_frame_loaded) per fetch completion,
/// [`load_next_batch`](Self::load_next_batch) when a scheduled batch delay
/// expires, [`tick`](Self::tick) per display refresh and
/// [`resize`](Self::resize) on window resize.
pub struct HeroPlayer<S: Surface> {
    surface: S,
    store: FrameStore<S::Image>,
    loader: Loader,
    renderer: Renderer,
    scheduler: Scheduler,
    batch_delay: Duration,
}

impl<S: Surface> HeroPlayer<S> {
    pub fn new(config: &PlayerConfig, surface: S) -> PulseResult<Self> {
        config.validate()?;
        let total = config.frame_count;
        Ok(Self {
            surface,
            store: FrameStore::new(total, config.assets.clone()),
            loader: Loader::new(
                BatchPlan::new(&config.batch_boundaries, total),
                total,
                config.ready_threshold,
            ),
            renderer: Renderer::from_config(config)?,
            scheduler: Scheduler::from_config(config),
            batch_delay: Duration::from_millis(config.batch_delay_ms),
        })
    }

    /// Request the first batch.
    pub fn boot<F>(&mut self, fetcher: &mut F) -> PulseResult<Vec<PlayerSignal>>
    where
        F: FrameFetcher<Image = S::Image>,
    {
        tracing::info!(
            "hero sequence of {} frames in {} batches",
            self.store.len(),
            self.loader.plan().len()
        );
        self.load_next_batch(fetcher)
    }

    /// Start the next batch once the host's delay has elapsed.
    pub fn load_next_batch<F>(&mut self, fetcher: &mut F) -> PulseResult<Vec<PlayerSignal>>
    where
        F: FrameFetcher<Image = S::Image>,
    {
        let events = self
            .loader
            .load_next_batch(&mut self.store, fetcher)?;
        Ok(self.handle_events(events))
    }

    /// Deliver a fetch completion for frame `index`.
    ///
    /// Completions for frames that are not loading (duplicates, unknown
    /// indices) are ignored.
    pub fn on_frame_loaded(
        &mut self,
        index: usize,
        outcome: Result<LoadedFrame<S::Image>, PulseError>,
    ) -> Vec<PlayerSignal> {
        let Some(status) = self.store.complete(index, outcome) else {
            tracing::debug!("ignoring completion for frame {} (not loading)", index);
            return Vec::new();
        };
        let events = self
            .loader
            .on_resolved(index, status == crate::store::FrameStatus::Ready);
        self.handle_events(events)
    }

    fn handle_events(&mut self, events: Vec<LoadEvent>) -> Vec<PlayerSignal> {
        let mut signals = Vec::new();
        for event in events {
            match event {
                LoadEvent::ThresholdReached { .. } => {
                    if !self.scheduler.is_running() {
                        self.scheduler.start();
                        signals.push(PlayerSignal::StartPlayback);
                    }
                }
                LoadEvent::BatchComplete { .. } if self.loader.has_remaining_batches() => {
                    signals.push(PlayerSignal::ScheduleNextBatch {
                        delay: self.batch_delay,
                    });
                }
                LoadEvent::FrameResolved { .. }
                | LoadEvent::BatchComplete { .. }
                | LoadEvent::AllBatchesComplete => {}
            }
        }
        signals
    }

    /// Display-refresh callback. Renders when the scheduler accepts the tick.
    pub fn tick(&mut self, now: Timestamp) -> Option<RenderOutcome> {
        let frame = self.scheduler.tick(now)?;
        Some(
            self.renderer
                .render(&mut self.surface, &self.store, frame.position, frame.direction),
        )
    }

    /// Window resize: resize the surface and redraw the current position if
    /// its base frame is ready.
    pub fn resize(&mut self, width: u32, height: u32) -> RenderOutcome {
        self.renderer.resize(
            &mut self.surface,
            &self.store,
            width,
            height,
            self.scheduler.position(),
            self.scheduler.direction(),
        )
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn store(&self) -> &FrameStore<S::Image> {
        &self.store
    }

    pub fn loader(&self) -> &Loader {
        &self.loader
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }
}
