use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::time::Duration;

use intersection_sim::{
    config::SimulationConfig,
    render::RecordingRenderer,
    simulation::{lane_transform, turn_path, Approach, Intersection, Lane, LanePosition},
};

fn benchmark_geometry(c: &mut Criterion) {
    c.bench_function("lane_transform_all", |b| {
        b.iter(|| {
            for approach in Approach::ALL {
                for lane in Lane::ALL {
                    black_box(lane_transform(approach, lane, LanePosition::Stop, black_box(1)));
                }
            }
        })
    });

    c.bench_function("turn_path_sample", |b| {
        b.iter(|| {
            let path = turn_path(black_box(Approach::North), Lane::LEFT, 0, true).unwrap();
            let length = path.length();
            for step in 0..60 {
                black_box(path.sample(length * step as f64 / 60.0));
            }
        })
    });
}

fn benchmark_simulated_minute(c: &mut Criterion) {
    let mut config = SimulationConfig::default();
    config.traffic.seed = Some(42);

    c.bench_function("simulated_minute_60hz", |b| {
        b.iter(|| {
            let mut intersection = Intersection::new(config.clone(), RecordingRenderer::new());
            for frame in 0..3_600u64 {
                intersection.tick(Duration::from_millis(frame * 1_000 / 60));
                if frame % 60 == 0 {
                    let renderer = intersection.renderer_mut();
                    renderer.complete_all();
                    renderer.take_commands();
                }
            }
            black_box(intersection.stats())
        })
    });
}

criterion_group!(benches, benchmark_geometry, benchmark_simulated_minute);
criterion_main!(benches);
