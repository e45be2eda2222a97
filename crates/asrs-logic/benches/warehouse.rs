use asrs_logic::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

fn filled(policy: RetrievalPolicy) -> Warehouse {
    let config = WarehouseConfig {
        max_items_per_cell: 16,
        retrieval_policy: policy,
        ..WarehouseConfig::new(GridDimensions::new(10, 10, 5))
    };
    let mut wh = Warehouse::new(config).expect("valid config");
    let positions: Vec<_> = wh.dimensions().positions().collect();
    for (i, p) in positions.into_iter().enumerate() {
        for j in 0..16 {
            let e = StoredEntity::new(format!("e{i}-{j}"), "bench").with_priority((j % 7) as i32);
            wh.put(e, p);
        }
    }
    wh
}

fn bench_put(c: &mut Criterion) {
    c.bench_function("transport_put_fill_grid", |b| {
        b.iter_batched(
            || {
                let config = WarehouseConfig {
                    max_items_per_cell: 4,
                    ..WarehouseConfig::new(GridDimensions::new(10, 10, 5))
                };
                Warehouse::new(config).expect("valid config")
            },
            |mut wh| {
                while let Some(p) = wh.first_available_position() {
                    wh.transport().put(StoredEntity::new("x", "bench"), p);
                }
                black_box(wh.total_entity_count())
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get(c: &mut Criterion) {
    for policy in RetrievalPolicy::ALL {
        c.bench_function(&format!("drain_{}", policy.label().to_lowercase()), |b| {
            b.iter_batched(
                || filled(policy),
                |mut wh| {
                    let positions: Vec<_> = wh.dimensions().positions().collect();
                    for p in positions {
                        while let Some(e) = wh.get(p) {
                            black_box(e);
                        }
                    }
                },
                BatchSize::LargeInput,
            )
        });
    }
}

fn bench_queries(c: &mut Criterion) {
    let wh = filled(RetrievalPolicy::Fifo);
    c.bench_function("find_positions", |b| b.iter(|| black_box(wh.find_positions("e250-3"))));
    c.bench_function("total_holding_cost", |b| {
        b.iter(|| black_box(wh.total_holding_cost(black_box(8.0))))
    });
}

criterion_group!(benches, bench_put, bench_get, bench_queries);
criterion_main!(benches);
