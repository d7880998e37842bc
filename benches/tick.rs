use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use particle_bridge::{ChannelBatch, Pulse, TickController, TickInput};

/// A square block of particle rows centered above the ground.
fn particle_rows(n: usize) -> ChannelBatch {
    let side = (n as f32).sqrt().ceil() as usize;
    let rows: Vec<[f32; 6]> = (0..n)
        .map(|i| {
            let x = (i % side) as f32 * 2.1 - side as f32;
            let y = (i / side) as f32 * 2.1 + 5.0;
            [1000.0 + i as f32, x, y, 0.0, 0.0, 1.0]
        })
        .collect();
    ChannelBatch::from_rows(&rows)
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    for &n in &[100usize, 400, 1600] {
        let batch = particle_rows(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &batch, |b, batch| {
            let mut controller = TickController::new();
            let idle = TickInput::default();
            controller.tick(&idle);
            controller.tick(&idle);
            controller.pulse(Pulse::Spawn);
            controller.tick(&TickInput::default().with_batch(batch));

            b.iter(|| controller.tick(&idle).num_samples())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
