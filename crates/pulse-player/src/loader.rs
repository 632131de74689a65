//! Progressive, batch-ordered frame loading.
//!
//! The sequence is split into consecutive batches. A batch is requested in
//! full, and the next one may only start after every frame of the current
//! batch has resolved, ready or failed. The delay between batches belongs to
//! the host; the loader only reports when a batch is done.

use std::ops::Range;

use pulse_core::{PulseError, PulseResult};

use crate::store::{FrameFetcher, FrameStore};

/// Consecutive, non-overlapping ranges covering `[0, N)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
    ranges: Vec<Range<usize>>,
}

impl BatchPlan {
    /// Split `[0, total)` at `boundaries`. Boundaries at or past `total` and
    /// repeated boundaries produce no empty batches.
    pub fn new(boundaries: &[usize], total: usize) -> Self {
        let mut ranges = Vec::with_capacity(boundaries.len() + 1);
        let mut start = 0;
        for &b in boundaries.iter().chain(std::iter::once(&total)) {
            let end = b.min(total);
            if end > start {
                ranges.push(start..end);
                start = end;
            }
        }
        Self { ranges }
    }

    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// Progress notifications from the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadEvent {
    /// One frame resolved; `ready` is false for a failed fetch.
    FrameResolved { index: usize, ready: bool },
    /// Enough frames have resolved for playback to begin. Emitted once.
    ThresholdReached { resolved: usize },
    /// Every frame of a batch resolved.
    BatchComplete { range: Range<usize> },
    /// The last batch resolved.
    AllBatchesComplete,
}

#[derive(Debug)]
struct ActiveBatch {
    range: Range<usize>,
    pending: usize,
}

/// Drives a [`FrameStore`] through a [`BatchPlan`].
#[derive(Debug)]
pub struct Loader {
    plan: BatchPlan,
    next_batch: usize,
    active: Option<ActiveBatch>,
    total: usize,
    resolved: usize,
    ready: usize,
    threshold: usize,
    threshold_reached: bool,
}

impl Loader {
    /// `threshold` is clamped to `total` so a short sequence can still start.
    pub fn new(plan: BatchPlan, total: usize, threshold: usize) -> Self {
        Self {
            plan,
            next_batch: 0,
            active: None,
            total,
            resolved: 0,
            ready: 0,
            threshold: threshold.min(total).max(1),
            threshold_reached: false,
        }
    }

    /// Request every frame in `[range.start, min(range.end, N))`.
    ///
    /// Fails with [`PulseError::LoaderBusy`] while another batch is in
    /// flight. An empty range completes immediately.
    pub fn load_range<I, F>(
        &mut self,
        range: Range<usize>,
        store: &mut FrameStore<I>,
        fetcher: &mut F,
    ) -> PulseResult<Vec<LoadEvent>>
    where
        F: FrameFetcher<Image = I>,
    {
        if let Some(active) = &self.active {
            return Err(PulseError::LoaderBusy {
                active: active.range.clone(),
            });
        }
        let range = range.start..range.end.min(self.total);
        let mut pending = 0;
        for index in range.clone() {
            if store.request(index, fetcher) {
                pending += 1;
            }
        }
        tracing::debug!("loading frames {:?} ({} requested)", range, pending);

        if pending == 0 {
            return Ok(self.finish_batch(range));
        }
        self.active = Some(ActiveBatch { range, pending });
        Ok(Vec::new())
    }

    /// Start the next planned batch. Returns no events when every batch has
    /// already been started.
    pub fn load_next_batch<I, F>(
        &mut self,
        store: &mut FrameStore<I>,
        fetcher: &mut F,
    ) -> PulseResult<Vec<LoadEvent>>
    where
        F: FrameFetcher<Image = I>,
    {
        if let Some(active) = &self.active {
            return Err(PulseError::LoaderBusy {
                active: active.range.clone(),
            });
        }
        let Some(range) = self.plan.ranges().get(self.next_batch).cloned() else {
            return Ok(Vec::new());
        };
        self.next_batch += 1;
        self.load_range(range, store, fetcher)
    }

    /// Record that frame `index` resolved. Call once per accepted store
    /// completion.
    pub fn on_resolved(&mut self, index: usize, ready: bool) -> Vec<LoadEvent> {
        let mut events = vec![LoadEvent::FrameResolved { index, ready }];
        self.resolved += 1;
        if ready {
            self.ready += 1;
        }
        if !self.threshold_reached && self.resolved >= self.threshold {
            self.threshold_reached = true;
            tracing::info!(
                "{} of {} frames resolved, playback can start",
                self.resolved,
                self.total
            );
            events.push(LoadEvent::ThresholdReached {
                resolved: self.resolved,
            });
        }

        let done = match &mut self.active {
            Some(active) if active.range.contains(&index) => {
                active.pending -= 1;
                active.pending == 0
            }
            _ => false,
        };
        if done {
            if let Some(active) = self.active.take() {
                events.extend(self.finish_batch(active.range));
            }
        }
        events
    }

    fn finish_batch(&mut self, range: Range<usize>) -> Vec<LoadEvent> {
        tracing::debug!(
            "batch {:?} resolved ({} ready, {} resolved so far)",
            range,
            self.ready,
            self.resolved
        );
        let mut events = vec![LoadEvent::BatchComplete { range }];
        if !self.has_remaining_batches() {
            tracing::info!("all {} frames resolved ({} ready)", self.total, self.ready);
            events.push(LoadEvent::AllBatchesComplete);
        }
        events
    }

    /// True while a batch has unresolved frames.
    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    pub fn has_remaining_batches(&self) -> bool {
        self.next_batch < self.plan.len()
    }

    pub fn resolved(&self) -> usize {
        self.resolved
    }

    pub fn ready(&self) -> usize {
        self.ready
    }

    pub fn threshold_reached(&self) -> bool {
        self.threshold_reached
    }

    pub fn plan(&self) -> &BatchPlan {
        &self.plan
    }
}
