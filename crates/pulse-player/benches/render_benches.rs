use criterion::{criterion_group, criterion_main, Criterion};
use pulse_core::{AssetPathTemplate, Color, FrameBuffer, PulseError};
use pulse_player::{
    Direction, FrameFetcher, FrameStore, LoadedFrame, PlaybackPosition, Renderer, SoftwareSurface,
    Surface,
};

struct Null;

impl FrameFetcher for Null {
    type Image = FrameBuffer;
    fn fetch(&mut self, _index: usize, _path: &str) {}
}

/// 140 frames at a typical source resolution, all ready.
fn create_store(width: u32, height: u32) -> FrameStore<FrameBuffer> {
    let mut store = FrameStore::new(140, AssetPathTemplate::default());
    for i in 0..140 {
        store.request(i, &mut Null);
        let shade = i as f32 / 140.0;
        let outcome: Result<_, PulseError> = Ok(LoadedFrame {
            image: FrameBuffer::solid(width, height, &Color::rgb(shade, 0.3, 1.0 - shade)),
            width,
            height,
        });
        store.complete(i, outcome);
    }
    store
}

fn bench_hero_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("pulse_hero_render");
    group.sample_size(10);

    let store = create_store(640, 360);
    let renderer = Renderer::default();

    group.bench_function("one_pass_quarter_step_140_frames", |b| {
        let mut surface = SoftwareSurface::new(1280, 720);
        b.iter(|| {
            let mut p = 0.0;
            while p <= 139.0 {
                let position = PlaybackPosition::new(p, 139);
                let _ = renderer.render(&mut surface, &store, position, Direction::Forward);
                surface.take_ops();
                p += 0.25;
            }
        });
    });

    group.bench_function("resize_portrait", |b| {
        let mut surface = SoftwareSurface::new(1280, 720);
        let position = PlaybackPosition::new(70.5, 139);
        b.iter(|| {
            let _ = renderer.resize(&mut surface, &store, 390, 844, position, Direction::Forward);
            surface.set_size(1280, 720);
            surface.take_ops();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_hero_render);
criterion_main!(benches);
