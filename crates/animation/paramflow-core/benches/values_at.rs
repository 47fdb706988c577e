use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use paramflow_core::{bake_segments, Config, Engine, SegmentSampler};

const DURATION: f64 = 60.0;

/// Engine with `params` parameters, each keyed every `step` seconds across the timeline
fn populated_engine(params: usize, step: f64, cfg: Config) -> Engine {
    let names: Vec<String> = (0..params).map(|i| format!("param.{i}")).collect();
    let mut engine = Engine::with_config(names.iter().map(|n| (n.clone(), 0.0)), cfg);
    let keys = (DURATION / step) as usize;
    for (p, name) in names.iter().enumerate() {
        for k in 1..=keys {
            let t = k as f64 * step;
            let value = ((p + k) as f64 * 0.37).sin();
            let velocity = (k % 3 == 0).then_some(0.0);
            engine
                .upsert_keyframe(name, t, value, velocity, None)
                .unwrap();
        }
    }
    engine
}

fn values_at(c: &mut Criterion) {
    let mut group = c.benchmark_group("values_at");
    for &params in &[16_usize, 128, 512] {
        group.throughput(Throughput::Elements(params as u64));

        let quintic = populated_engine(params, 0.25, Config::default());
        group.bench_with_input(BenchmarkId::new("engine_quintic", params), &quintic, |b, e| {
            let mut t = 0.0;
            b.iter(|| {
                t = (t + 0.016) % DURATION;
                black_box(e.values_at(black_box(t)))
            })
        });

        let cubic = populated_engine(params, 0.25, Config::cubic());
        group.bench_with_input(BenchmarkId::new("engine_cubic", params), &cubic, |b, e| {
            let mut t = 0.0;
            b.iter(|| {
                t = (t + 0.016) % DURATION;
                black_box(e.values_at(black_box(t)))
            })
        });

        let baked = SegmentSampler::new(bake_segments(&quintic, DURATION));
        group.bench_with_input(BenchmarkId::new("segments", params), &baked, |b, s| {
            let mut t = 0.0;
            b.iter(|| {
                t = (t + 0.016) % DURATION;
                black_box(s.values_at(black_box(t)))
            })
        });
    }
    group.finish();
}

fn upsert(c: &mut Criterion) {
    c.bench_function("upsert_keyframe_dense_track", |b| {
        b.iter_batched(
            || populated_engine(1, 0.01, Config::default()),
            |mut engine| {
                engine
                    .upsert_keyframe("param.0", black_box(30.005), 1.0, None, None)
                    .unwrap();
                engine
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, values_at, upsert);
criterion_main!(benches);
