use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use winhack_core::config::{ResourcePlacement, UnitPlacement};
use winhack_core::prelude::*;

/// Crowded session: many units inside a grown region with scattered resources
fn crowded_config(units: usize, resources: usize) -> SimConfig {
    let mut config = SimConfig {
        seed: Some(0xBEEF),
        ..Default::default()
    };
    config.region.half_extent = Vec2::new(15.0, 15.0);
    config.scene.units = (0..units)
        .map(|i| UnitPlacement {
            archetype: if i % 5 == 0 { "special" } else { "worker" }.to_string(),
            position: Vec2::new((i % 20) as f32 - 10.0, (i / 20) as f32 - 10.0),
        })
        .collect();
    config.scene.resources = (0..resources)
        .map(|i| ResourcePlacement {
            kind: if i % 3 == 0 { ResourceKind::Mine } else { ResourceKind::Tree },
            position: Vec2::new((i * 7 % 29) as f32 - 14.0, (i * 11 % 29) as f32 - 14.0),
        })
        .collect();
    config
}

fn bench_ticks(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    let steps = 60;

    for &(units, resources) in &[(50usize, 20usize), (200, 80), (400, 200)] {
        group.bench_function(format!("steps{}_units{}_resources{}", steps, units, resources), |b| {
            b.iter_batched(
                || Simulation::new(crowded_config(units, resources)).unwrap(),
                |mut sim| {
                    for _ in 0..steps {
                        sim.update(1.0 / 60.0, &InputFrame::idle());
                        sim.drain_events();
                    }
                    sim
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_ticks);
criterion_main!(benches);
