use std::collections::VecDeque;

use pulse_core::hash::hash_frame;
use pulse_core::{Color, FrameBuffer, PixelFormat, PlayerConfig, PulseError, Timestamp};
use pulse_player::image_loader::DiskFetcher;
use pulse_player::{
    Direction, FrameFetcher, FrameStatus, HeroPlayer, LoadedFrame, PlaybackPosition, PlayerSignal,
    RenderOutcome, SoftwareSurface,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Records every fetch and lets the test decide when and how it resolves.
#[derive(Default)]
struct ManualFetcher {
    queue: VecDeque<usize>,
    requested: Vec<usize>,
    failing: Vec<usize>,
}

impl FrameFetcher for ManualFetcher {
    type Image = FrameBuffer;

    fn fetch(&mut self, index: usize, _path: &str) {
        self.queue.push_back(index);
        self.requested.push(index);
    }
}

impl ManualFetcher {
    fn failing(indices: &[usize]) -> Self {
        Self {
            failing: indices.to_vec(),
            ..Self::default()
        }
    }

    fn outcome(&self, index: usize) -> Result<LoadedFrame<FrameBuffer>, PulseError> {
        if self.failing.contains(&index) {
            return Err(PulseError::fetch(index, format!("Gif_{:03}.jpg", index), "404"));
        }
        let shade = index as f32 / 140.0;
        Ok(LoadedFrame {
            image: FrameBuffer::solid(16, 9, &Color::rgb(shade, 0.2, 1.0 - shade)),
            width: 16,
            height: 9,
        })
    }
}

/// Resolve every queued fetch, honouring batch-delay signals immediately,
/// until nothing is left in flight. Returns all signals seen.
fn load_everything(
    player: &mut HeroPlayer<SoftwareSurface>,
    fetcher: &mut ManualFetcher,
) -> Vec<PlayerSignal> {
    let mut seen = player.boot(fetcher).unwrap();
    let mut pending_batch = seen
        .iter()
        .any(|s| matches!(s, PlayerSignal::ScheduleNextBatch { .. }));
    loop {
        while let Some(index) = fetcher.queue.pop_front() {
            let outcome = fetcher.outcome(index);
            let signals = player.on_frame_loaded(index, outcome);
            pending_batch |= signals
                .iter()
                .any(|s| matches!(s, PlayerSignal::ScheduleNextBatch { .. }));
            seen.extend(signals);
        }
        if !pending_batch {
            break;
        }
        pending_batch = false;
        seen.extend(player.load_next_batch(fetcher).unwrap());
    }
    seen
}

fn fully_loaded(config: &PlayerConfig, failing: &[usize]) -> HeroPlayer<SoftwareSurface> {
    let mut player = HeroPlayer::new(config, SoftwareSurface::new(32, 18)).unwrap();
    let mut fetcher = ManualFetcher::failing(failing);
    load_everything(&mut player, &mut fetcher);
    player
}

/// Ticks `spacing_ms` apart; `count` ticks starting at tick number `from`.
fn ticks_every(
    player: &mut HeroPlayer<SoftwareSurface>,
    from: usize,
    count: usize,
    spacing_ms: f64,
) -> Vec<RenderOutcome> {
    (from..from + count)
        .filter_map(|i| player.tick(Timestamp::from_millis(i as f64 * spacing_ms)))
        .collect()
}

/// Spaced wider than the 60 Hz interval, so every tick is accepted.
fn ticks(player: &mut HeroPlayer<SoftwareSurface>, from: usize, count: usize) -> Vec<RenderOutcome> {
    ticks_every(player, from, count, 20.0)
}

#[test]
fn test_scenario_140_frames_quarter_step() {
    init_tracing();
    let config = PlayerConfig::default();
    let mut player = fully_loaded(&config, &[]);
    assert!(player.scheduler().is_running());

    let outcomes = ticks(&mut player, 0, 4);
    assert_eq!(outcomes.len(), 4);
    assert_eq!(player.scheduler().position().value(), 1.0);
    assert_eq!(player.scheduler().direction(), Direction::Forward);

    // position 1.0 is drawn on the next tick: base only, no blend layer
    let next = ticks(&mut player, 4, 1);
    assert!(matches!(next[0], RenderOutcome::Base { index: 1, .. }));

    ticks(&mut player, 5, 551);
    assert_eq!(player.scheduler().position().value(), 139.0);
    assert_eq!(player.scheduler().direction(), Direction::Backward);
}

#[test]
fn test_ping_pong_returns_to_start() {
    let config = PlayerConfig::default();
    let mut player = fully_loaded(&config, &[]);

    let mut directions = vec![player.scheduler().direction()];
    for i in 0..(556 * 2 + 556) {
        player.tick(Timestamp::from_millis(i as f64 * 20.0));
        let d = player.scheduler().direction();
        if directions.last() != Some(&d) {
            directions.push(d);
        }
        if i == 556 * 2 - 1 {
            assert_eq!(player.scheduler().position().value(), 0.0);
            assert_eq!(d, Direction::Forward);
        }
    }
    assert_eq!(
        directions,
        vec![
            Direction::Forward,
            Direction::Backward,
            Direction::Forward,
            Direction::Backward
        ]
    );
}

#[test]
fn test_batches_never_overlap_in_time() {
    init_tracing();
    let config = PlayerConfig::default();
    let mut player = HeroPlayer::new(&config, SoftwareSurface::new(32, 18)).unwrap();
    let mut fetcher = ManualFetcher::failing(&[3, 31]);

    player.boot(&mut fetcher).unwrap();
    assert_eq!(fetcher.requested, (0..30).collect::<Vec<_>>());

    // resolve out of order; nothing from the next batch may be requested
    let mut first: Vec<usize> = fetcher.queue.drain(..).collect();
    first.reverse();
    for (n, index) in first.into_iter().enumerate() {
        assert!(player.load_next_batch(&mut fetcher).is_err());
        assert_eq!(fetcher.requested.len(), 30);
        let signals = player.on_frame_loaded(index, fetcher.outcome(index));
        if n < 29 {
            assert!(signals.is_empty());
        } else {
            assert!(signals.contains(&PlayerSignal::StartPlayback));
            assert!(signals
                .iter()
                .any(|s| matches!(s, PlayerSignal::ScheduleNextBatch { .. })));
        }
    }

    player.load_next_batch(&mut fetcher).unwrap();
    assert_eq!(fetcher.requested[30..], (30..80).collect::<Vec<_>>()[..]);
    assert_eq!(player.store().status(80), Some(FrameStatus::NotRequested));
    assert_eq!(player.store().status(3), Some(FrameStatus::Failed));
}

#[test]
fn test_playback_starts_before_full_load() {
    let config = PlayerConfig::default();
    let mut player = HeroPlayer::new(&config, SoftwareSurface::new(32, 18)).unwrap();
    let mut fetcher = ManualFetcher::default();
    player.boot(&mut fetcher).unwrap();
    while let Some(index) = fetcher.queue.pop_front() {
        player.on_frame_loaded(index, fetcher.outcome(index));
    }
    assert!(player.scheduler().is_running());
    assert_eq!(player.store().count(FrameStatus::Ready), 30);

    // frames past the loaded frontier are skipped, not an error
    let outcomes = ticks(&mut player, 0, 200);
    assert!(outcomes[0].is_drawn());
    assert!(outcomes[..116].iter().all(RenderOutcome::is_drawn));
    assert!(outcomes[120..].iter().all(|o| *o == RenderOutcome::Skipped));
}

#[test]
fn test_failed_frame_47_is_skipped() {
    let config = PlayerConfig::default();
    let mut player = fully_loaded(&config, &[47]);
    assert_eq!(player.store().status(47), Some(FrameStatus::Failed));

    let mut surface = SoftwareSurface::new(32, 18);
    let outcome = player.renderer().render(
        &mut surface,
        player.store(),
        PlaybackPosition::new(47.3, 139),
        Direction::Forward,
    );
    assert_eq!(outcome, RenderOutcome::Skipped);
    assert!(surface.ops().is_empty());

    // 46.x blends toward the failed frame: base only
    let outcome = player.renderer().render(
        &mut surface,
        player.store(),
        PlaybackPosition::new(46.5, 139),
        Direction::Forward,
    );
    assert!(matches!(outcome, RenderOutcome::Base { index: 46, .. }));

    // and playback sails straight through it
    let outcomes = ticks(&mut player, 0, 300);
    let skipped = outcomes
        .iter()
        .filter(|o| **o == RenderOutcome::Skipped)
        .count();
    assert_eq!(skipped, 4);
}

#[test]
fn test_resize_is_idempotent() {
    let config = PlayerConfig::default();
    let mut player = fully_loaded(&config, &[]);
    ticks(&mut player, 0, 10);

    let a = player.resize(40, 30);
    let hash_a = hash_frame(player.surface().buffer());
    let b = player.resize(40, 30);
    let hash_b = hash_frame(player.surface().buffer());
    assert_eq!(a, b);
    assert!(a.is_drawn());
    assert_eq!(hash_a, hash_b);
    assert_eq!(player.surface().buffer().width, 40);
}

#[test]
fn test_resize_before_any_frame_is_noop_render() {
    let config = PlayerConfig::default();
    let mut player = HeroPlayer::new(&config, SoftwareSurface::new(32, 18)).unwrap();
    assert_eq!(player.resize(64, 36), RenderOutcome::Skipped);
    assert!(player.surface().ops().is_empty());
    assert_eq!(player.surface().buffer().width, 64);
}

#[test]
fn test_classic_preset_never_blends() {
    let config = PlayerConfig::classic();
    let mut player = fully_loaded(&config, &[]);
    // 18 updates/s: ticks 20 ms apart are mostly dropped
    assert_eq!(ticks(&mut player, 0, 10).len(), 4);

    let mut player = fully_loaded(&config, &[]);
    let outcomes = ticks_every(&mut player, 0, 300, 60.0);
    assert_eq!(outcomes.len(), 300);
    assert!(outcomes
        .iter()
        .all(|o| matches!(o, RenderOutcome::Base { .. })));
    // whole frames: end after 139 ticks, back at the start after 278
    assert_eq!(player.scheduler().direction(), Direction::Forward);
    assert_eq!(player.scheduler().position().value(), 22.0);
}

#[test]
fn test_disk_frames_decode_and_missing_fail() {
    init_tracing();
    let root = std::env::temp_dir().join(format!("pulse-frames-{}", std::process::id()));
    let dir = root.join("Gif-Images");
    std::fs::create_dir_all(&dir).unwrap();
    for i in 0..6 {
        if i == 3 {
            continue;
        }
        let img = image::RgbImage::from_pixel(8, 6, image::Rgb([i as u8 * 40, 10, 200]));
        img.save(dir.join(format!("Gif_{:03}.jpg", i))).unwrap();
    }

    let config = PlayerConfig {
        frame_count: 6,
        batch_boundaries: vec![2, 4],
        ready_threshold: 2,
        ..PlayerConfig::default()
    };
    let mut player = HeroPlayer::new(&config, SoftwareSurface::new(12, 12)).unwrap();
    let mut fetcher = DiskFetcher::new(&root);

    let mut signals = player.boot(&mut fetcher).unwrap();
    loop {
        for (index, outcome) in fetcher.drain() {
            signals.extend(player.on_frame_loaded(index, outcome));
        }
        let more = signals
            .drain(..)
            .any(|s| matches!(s, PlayerSignal::ScheduleNextBatch { .. }));
        if !more {
            break;
        }
        signals = player.load_next_batch(&mut fetcher).unwrap();
    }

    assert_eq!(player.store().count(FrameStatus::Ready), 5);
    assert_eq!(player.store().status(3), Some(FrameStatus::Failed));
    let frame = player.store().get(0).unwrap();
    assert_eq!((frame.image.width, frame.image.height), (8, 6));
    assert_eq!(frame.image.format, PixelFormat::Rgb8);

    assert!(player.tick(Timestamp::from_millis(0.0)).unwrap().is_drawn());
    let _ = std::fs::remove_dir_all(&root);
}
