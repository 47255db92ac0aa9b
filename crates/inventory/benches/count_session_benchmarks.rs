use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use optistock_core::ItemId;
use optistock_inventory::{
    compute_aggregate_variance, CompletionRule, CountSession, InventoryLine, ItemCategory,
};

fn lines(size: u32) -> Vec<InventoryLine> {
    (1..=size)
        .map(|i| {
            InventoryLine::new(
                ItemId::new(i),
                format!("Article {i}"),
                format!("REF-{i:05}"),
                ItemCategory::Frames,
                "A1-B2",
                i % 40,
            )
        })
        .collect()
}

fn counted_session(size: u32) -> CountSession {
    let mut session = CountSession::new(lines(size), CompletionRule::Legacy)
        .expect("generated ids are unique");
    for i in 1..=size {
        // Every third line is off by one.
        let system = i64::from(i % 40);
        let counted = if i % 3 == 0 { system + 1 } else { system.max(1) };
        session.record_count(ItemId::new(i), counted);
    }
    session
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("count_session_validate");

    for size in [10u32, 100, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(u64::from(*size)));
        group.bench_with_input(BenchmarkId::new("committed", size), size, |b, &size| {
            let session = counted_session(size);
            b.iter(|| {
                let mut s = session.clone();
                black_box(s.validate());
            });
        });
    }

    group.finish();
}

fn bench_aggregate_variance(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate_variance");

    for size in [100u32, 10_000].iter() {
        group.throughput(Throughput::Elements(u64::from(*size)));
        group.bench_with_input(BenchmarkId::new("sum", size), size, |b, &size| {
            let session = counted_session(size);
            b.iter(|| black_box(compute_aggregate_variance(session.lines())));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_validate, bench_aggregate_variance);
criterion_main!(benches);
